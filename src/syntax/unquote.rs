//! Decoding of Go string literals.

use std::str::Chars;

/// Decode a Go string literal as written in source.
///
/// Raw literals (`` `...` ``) are returned verbatim with carriage returns
/// removed. Interpreted literals (`"..."`) have their escape sequences
/// resolved. Returns `None` for text that is not a well-formed literal.
pub fn unquote(literal: &str) -> Option<String> {
    if literal.len() < 2 {
        return None;
    }

    if let Some(body) = literal.strip_prefix('`').and_then(|s| s.strip_suffix('`')) {
        return Some(body.replace('\r', ""));
    }

    let body = literal.strip_prefix('"')?.strip_suffix('"')?;
    if body.contains('\n') {
        return None;
    }

    // Octal and hex escapes denote bytes, not characters.
    let mut out: Vec<u8> = Vec::with_capacity(body.len());
    let mut chars = body.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' => return None,
            '\\' => decode_escape(&mut chars, &mut out)?,
            _ => {
                let mut buf = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
        }
    }

    Some(match String::from_utf8(out) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}

fn decode_escape(chars: &mut Chars, out: &mut Vec<u8>) -> Option<()> {
    let byte = match chars.next()? {
        'a' => 0x07,
        'b' => 0x08,
        'f' => 0x0c,
        'n' => b'\n',
        'r' => b'\r',
        't' => b'\t',
        'v' => 0x0b,
        '\\' => b'\\',
        '"' => b'"',
        'x' => u8::try_from(read_digits(chars, 2, 16)?).ok()?,
        d @ '0'..='7' => {
            let rest = read_digits(chars, 2, 8)?;
            u8::try_from(d.to_digit(8)? * 64 + rest).ok()?
        }
        'u' => return push_char(read_digits(chars, 4, 16)?, out),
        'U' => return push_char(read_digits(chars, 8, 16)?, out),
        _ => return None,
    };
    out.push(byte);
    Some(())
}

fn read_digits(chars: &mut Chars, count: usize, radix: u32) -> Option<u32> {
    let mut value = 0u32;
    for _ in 0..count {
        let digit = chars.next()?.to_digit(radix)?;
        value = value * radix + digit;
    }
    Some(value)
}

fn push_char(code: u32, out: &mut Vec<u8>) -> Option<()> {
    let c = char::from_u32(code)?;
    let mut buf = [0u8; 4];
    out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
    Some(())
}
