//! Output documents for extracted strings.
//!
//! Each source file's strings are written next to it (or into an output
//! directory) as:
//!
//! - `<file>.en.json`: translation table, `[{id, translation, modified}]`
//! - `<file>.extracted.json`: per-string metadata (with `--meta`)
//! - `<file>.en.po`: gettext catalog (with `--po`)
//!
//! JSON is indented with three spaces. `<`, `>` and `&` are written as-is.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use thiserror::Error;
use tracing::info;

use crate::results::ResultSet;
use crate::session::FileReport;

/// Errors that can occur while writing output documents.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Where and what to write.
#[derive(Debug, Clone, Default)]
pub struct OutputOptions {
    /// Output directory. `None` writes next to each source file.
    pub output_dir: Option<PathBuf>,
    /// Also write `<file>.extracted.json`.
    pub meta: bool,
    /// Also write `<file>.en.po`.
    pub po: bool,
    /// Compute everything, write nothing.
    pub dry_run: bool,
}

#[derive(Debug, Serialize)]
struct I18nString<'a> {
    id: &'a str,
    translation: &'a str,
    modified: bool,
}

/// Serialize with the three-space indentation of the translation files.
pub fn to_json_pretty<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"   "));
    value.serialize(&mut serializer)?;
    // serde_json only ever emits valid UTF-8.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// The translation table: every string mapped to itself, unmodified.
pub fn format_i18n_json(strings: &ResultSet) -> Result<String, serde_json::Error> {
    let table: Vec<I18nString> = strings
        .keys()
        .map(|value| I18nString {
            id: value,
            translation: value,
            modified: false,
        })
        .collect();
    to_json_pretty(&table)
}

/// Per-string metadata records.
pub fn format_extracted_json(strings: &ResultSet) -> Result<String, serde_json::Error> {
    let records: Vec<_> = strings.values().collect();
    to_json_pretty(&records)
}

/// A gettext catalog with the source strings as both id and translation.
pub fn format_po(strings: &ResultSet) -> String {
    let mut out = String::new();
    for info in strings.values() {
        let value = escape_po(&info.value);
        out.push_str(&format!(
            "# filename: {}, offset: {}, line: {}, column: {}\n",
            info.filename.display(),
            info.offset,
            info.line,
            info.column
        ));
        out.push_str(&format!("msgid \"{value}\"\nmsgstr \"{value}\"\n\n"));
    }
    out
}

fn escape_po(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 8);
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out
}

/// Directory the documents of `source` are written to.
pub fn output_dir_for(source: &Path, options: &OutputOptions) -> PathBuf {
    match &options.output_dir {
        Some(dir) => dir.clone(),
        None => source
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    }
}

/// Write the documents for one file. Returns the paths written.
///
/// Files without strings produce no documents.
pub fn write_report(report: &FileReport, options: &OutputOptions) -> Result<Vec<PathBuf>, OutputError> {
    if report.strings.is_empty() {
        return Ok(Vec::new());
    }

    let dir = output_dir_for(&report.path, options);
    let base = report
        .path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "strings".to_string());

    let mut documents = vec![(format!("{base}.en.json"), format_i18n_json(&report.strings)?)];
    if options.meta {
        documents.push((format!("{base}.extracted.json"), format_extracted_json(&report.strings)?));
    }
    if options.po {
        documents.push((format!("{base}.en.po"), format_po(&report.strings)));
    }

    let paths: Vec<PathBuf> = documents.iter().map(|(name, _)| dir.join(name)).collect();
    if options.dry_run {
        info!(path = %report.path.display(), documents = paths.len(), "dry run, not writing");
        return Ok(paths);
    }

    fs::create_dir_all(&dir).map_err(|source| OutputError::Io {
        path: dir.clone(),
        source,
    })?;
    for ((_, content), path) in documents.iter().zip(&paths) {
        fs::write(path, content).map_err(|source| OutputError::Io {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), "wrote strings");
    }

    Ok(paths)
}
