//! Literal classification.
//!
//! Each string literal goes through an ordered pipeline of stages; the first
//! stage that reaches a verdict decides:
//!
//! 1. capture-group patterns (a match accepts the captured group and skips
//!    every exclusion below)
//! 2. line exclusion (skipped for arguments of enforced functions)
//! 3. decoding, rejecting empty and whitespace-only strings
//! 4. exact exclusions, including the file's import paths
//! 5. exclusion regexps
//! 6. accept the decoded literal

use tracing::{debug, warn};

use crate::patterns::PatternSet;
use crate::syntax::unquote;

/// Whitespace-only values that are never worth translating.
pub const BLANKS: [&str; 6] = [", ", "\t", "\n", "\n\t", "\t\n", " "];

/// Why a literal was not extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    ExcludedLine,
    /// Empty, whitespace-only, or not a decodable literal.
    Blank,
    ImportPath,
    ExcludedString,
    ExcludedRegexp,
}

/// Verdict for one literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Reject(RejectReason),
    AcceptVerbatim(String),
    AcceptCaptured(String),
}

impl Decision {
    /// The value to record, if accepted.
    pub fn into_value(self) -> Option<String> {
        match self {
            Decision::Reject(_) => None,
            Decision::AcceptVerbatim(value) | Decision::AcceptCaptured(value) => Some(value),
        }
    }

    pub fn is_accepted(&self) -> bool {
        !matches!(self, Decision::Reject(_))
    }
}

/// A literal about to be classified.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    /// Literal text as written, quotes included.
    pub raw: &'a str,
    /// The source line holding the literal, when available.
    pub source_line: Option<&'a str>,
    /// Set for arguments of enforced functions.
    pub must_include: bool,
}

/// Run the classification pipeline for one literal.
///
/// `imports` are the import paths of the file the literal belongs to.
pub fn classify(candidate: &Candidate, patterns: &PatternSet, imports: &[String]) -> Decision {
    if let Some(captured) = capture_substring(patterns, candidate.raw) {
        return admit_captured(captured, imports);
    }

    if !candidate.must_include && excluded_by_line(patterns, candidate.source_line) {
        return Decision::Reject(RejectReason::ExcludedLine);
    }

    let Some(value) = decode(candidate.raw) else {
        return Decision::Reject(RejectReason::Blank);
    };

    if let Some(reason) = excluded_string(patterns, imports, &value) {
        return Decision::Reject(reason);
    }

    if patterns.matches_excluded_regexp(&value) {
        return Decision::Reject(RejectReason::ExcludedRegexp);
    }

    Decision::AcceptVerbatim(value)
}

/// Stage 1: the first capture pattern that matches the raw literal and has a
/// capturing group yields group 1.
pub fn capture_substring(patterns: &PatternSet, raw: &str) -> Option<String> {
    for re in patterns.capture_groups() {
        let Some(captures) = re.captures(raw) else {
            continue;
        };

        if re.captures_len() < 2 {
            warn!(pattern = %re.as_str(), "no capturing group found, skipping pattern");
            continue;
        }

        let captured = captures.get(1).map_or("", |m| m.as_str());
        debug!(pattern = %re.as_str(), captured, "captured substring");
        return Some(captured.to_string());
    }
    None
}

/// Captured values bypass configured exclusions but may still never be
/// blank or one of the file's import paths.
fn admit_captured(captured: String, imports: &[String]) -> Decision {
    if is_blank(&captured) {
        Decision::Reject(RejectReason::Blank)
    } else if imports.contains(&captured) {
        Decision::Reject(RejectReason::ImportPath)
    } else {
        Decision::AcceptCaptured(captured)
    }
}

/// Stage 2: the literal's source line contains a configured substring.
///
/// An unavailable line never excludes.
pub fn excluded_by_line(patterns: &PatternSet, source_line: Option<&str>) -> bool {
    if !patterns.has_line_exclusions() {
        return false;
    }
    source_line.is_some_and(|line| patterns.excludes_line(line))
}

/// Stage 3: decode the literal, dropping blank results.
pub fn decode(raw: &str) -> Option<String> {
    unquote(raw).filter(|value| !is_blank(value))
}

pub fn is_blank(value: &str) -> bool {
    value.is_empty() || BLANKS.contains(&value)
}

/// Stage 4: exact exclusions.
pub fn excluded_string(
    patterns: &PatternSet,
    imports: &[String],
    value: &str,
) -> Option<RejectReason> {
    if imports.iter().any(|import| import == value) {
        Some(RejectReason::ImportPath)
    } else if patterns.is_excluded_string(value) {
        Some(RejectReason::ExcludedString)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::{CaptureGroupSubstrings, ExcludedStrings};

    fn patterns(excluded: ExcludedStrings, captures: &[&str]) -> PatternSet {
        PatternSet::from_documents(
            excluded,
            CaptureGroupSubstrings {
                capture_group_substrings: captures.iter().map(|s| s.to_string()).collect(),
            },
        )
    }

    fn candidate<'a>(raw: &'a str, line: &'a str, must_include: bool) -> Candidate<'a> {
        Candidate {
            raw,
            source_line: Some(line),
            must_include,
        }
    }

    #[test]
    fn test_accepts_plain_literal() {
        let set = PatternSet::default();
        let decision = classify(&candidate(r#""Hello, world""#, "", false), &set, &[]);
        assert_eq!(decision, Decision::AcceptVerbatim("Hello, world".into()));
    }

    #[test]
    fn test_rejects_blanks_regardless_of_configuration() {
        let set = patterns(
            ExcludedStrings {
                enforced_funcs: vec!["T".into()],
                ..Default::default()
            },
            &[],
        );
        for raw in [r#""""#, r#""\t""#, r#""\n""#, r#"" ""#, r#"", ""#, r#""\t\n""#, r#""\n\t""#] {
            assert_eq!(
                classify(&candidate(raw, "", true), &set, &[]),
                Decision::Reject(RejectReason::Blank),
                "{raw}"
            );
        }
    }

    #[test]
    fn test_capture_bypasses_exclusions() {
        let set = patterns(
            ExcludedStrings {
                excluded_strings: vec!["\"prefix_hello_suffix\"".into(), "prefix_hello_suffix".into()],
                excluded_lines: vec!["skip".into()],
                excluded_regexps: vec!["prefix".into()],
                ..Default::default()
            },
            &[r"prefix_(\w+)_suffix"],
        );

        let decision = classify(
            &candidate(r#""prefix_hello_suffix""#, "skip(\"prefix_hello_suffix\")", false),
            &set,
            &[],
        );
        assert_eq!(decision, Decision::AcceptCaptured("hello".into()));
    }

    #[test]
    fn test_first_capture_pattern_wins() {
        let set = patterns(ExcludedStrings::default(), &[r"id=(\d+)", r"id=(\d)"]);
        let decision = classify(&candidate(r#""id=42""#, "", false), &set, &[]);
        assert_eq!(decision, Decision::AcceptCaptured("42".into()));
    }

    #[test]
    fn test_groupless_capture_pattern_is_skipped() {
        let set = patterns(ExcludedStrings::default(), &["hello", r"(h\w+)"]);
        let decision = classify(&candidate(r#""hello there""#, "", false), &set, &[]);
        assert_eq!(decision, Decision::AcceptCaptured("hello".into()));

        let set = patterns(ExcludedStrings::default(), &["hello"]);
        let decision = classify(&candidate(r#""hello there""#, "", false), &set, &[]);
        assert_eq!(decision, Decision::AcceptVerbatim("hello there".into()));
    }

    #[test]
    fn test_captured_import_path_is_rejected() {
        let set = patterns(ExcludedStrings::default(), &[r#""(\S+)""#]);
        let imports = vec!["net/http".to_string()];
        let decision = classify(&candidate(r#""net/http""#, "", false), &set, &imports);
        assert_eq!(decision, Decision::Reject(RejectReason::ImportPath));
    }

    #[test]
    fn test_line_exclusion_and_enforced_override() {
        let set = patterns(
            ExcludedStrings {
                excluded_strings: vec!["noise".into()],
                excluded_lines: vec!["log.Debug".into()],
                ..Default::default()
            },
            &[],
        );
        let line = r#"    log.Debug(T("Shown to users"), T("noise"))"#;

        assert_eq!(
            classify(&candidate(r#""Shown to users""#, line, false), &set, &[]),
            Decision::Reject(RejectReason::ExcludedLine)
        );
        assert_eq!(
            classify(&candidate(r#""Shown to users""#, line, true), &set, &[]),
            Decision::AcceptVerbatim("Shown to users".into())
        );
        assert_eq!(
            classify(&candidate(r#""noise""#, line, true), &set, &[]),
            Decision::Reject(RejectReason::ExcludedString)
        );
    }

    #[test]
    fn test_unreadable_line_never_excludes() {
        let set = patterns(
            ExcludedStrings {
                excluded_lines: vec!["log".into()],
                ..Default::default()
            },
            &[],
        );
        let candidate = Candidate {
            raw: r#""kept""#,
            source_line: None,
            must_include: false,
        };
        assert!(classify(&candidate, &set, &[]).is_accepted());
    }

    #[test]
    fn test_exact_and_regexp_exclusion() {
        let set = patterns(
            ExcludedStrings {
                excluded_strings: vec!["application/json".into()],
                excluded_regexps: vec![r"^[A-Z_]+$".into()],
                ..Default::default()
            },
            &[],
        );

        assert_eq!(
            classify(&candidate(r#""application/json""#, "", false), &set, &[]),
            Decision::Reject(RejectReason::ExcludedString)
        );
        assert_eq!(
            classify(&candidate(r#""MAX_RETRIES""#, "", false), &set, &[]),
            Decision::Reject(RejectReason::ExcludedRegexp)
        );
        assert_eq!(
            classify(&candidate(r#""fmt""#, "", false), &set, &["fmt".to_string()]),
            Decision::Reject(RejectReason::ImportPath)
        );
    }

    #[test]
    fn test_raw_literal_decoding() {
        let set = PatternSet::default();
        assert_eq!(
            classify(&candidate("`multi\nline`", "", false), &set, &[]),
            Decision::AcceptVerbatim("multi\nline".into())
        );
    }
}
