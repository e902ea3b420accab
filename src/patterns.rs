//! Pattern configuration loading.
//!
//! Two optional JSON documents drive extraction:
//!
//! - the excluded-strings document (`excludedStrings`, `excludedLines`,
//!   `excludedRegexps`, `excludedFileRegexps`, `enforcedFuncs`)
//! - the substring document (`captureGroupSubstrings`)
//!
//! A missing document contributes nothing. A document that exists but is not
//! valid JSON is a configuration error. Individual regular expressions that
//! fail to compile are skipped with a warning.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// Errors while loading pattern documents.
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("failed to read pattern document {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed pattern document {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// The excluded-strings document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExcludedStrings {
    pub excluded_strings: Vec<String>,
    pub excluded_lines: Vec<String>,
    pub excluded_regexps: Vec<String>,
    pub excluded_file_regexps: Vec<String>,
    pub enforced_funcs: Vec<String>,
}

/// The substring capture document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CaptureGroupSubstrings {
    pub capture_group_substrings: Vec<String>,
}

/// Compiled patterns for one extraction run.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    excluded_strings: HashSet<String>,
    excluded_lines: Vec<String>,
    excluded_regexps: Vec<Regex>,
    file_exclusion: Option<Regex>,
    capture_groups: Vec<Regex>,
    enforced_funcs: HashSet<String>,
}

impl PatternSet {
    /// Build a pattern set from already-parsed documents.
    pub fn from_documents(excluded: ExcludedStrings, substrings: CaptureGroupSubstrings) -> Self {
        let file_exclusion = if excluded.excluded_file_regexps.is_empty() {
            None
        } else {
            let joined = excluded.excluded_file_regexps.join("|");
            match Regex::new(&joined) {
                Ok(re) => Some(re),
                Err(e) => {
                    warn!(pattern = %joined, error = %e, "skipping invalid file exclusion pattern");
                    None
                }
            }
        };

        Self {
            excluded_strings: excluded.excluded_strings.into_iter().collect(),
            excluded_lines: excluded.excluded_lines,
            excluded_regexps: compile_all(&excluded.excluded_regexps, "exclusion"),
            file_exclusion,
            capture_groups: compile_all(&substrings.capture_group_substrings, "capture group"),
            enforced_funcs: excluded.enforced_funcs.into_iter().collect(),
        }
    }

    /// Whether `value` is one of the configured exact exclusions.
    pub fn is_excluded_string(&self, value: &str) -> bool {
        self.excluded_strings.contains(value)
    }

    /// Whether a source line contains one of the configured line substrings.
    pub fn excludes_line(&self, line: &str) -> bool {
        self.excluded_lines.iter().any(|needle| line.contains(needle.as_str()))
    }

    pub fn has_line_exclusions(&self) -> bool {
        !self.excluded_lines.is_empty()
    }

    /// Whether any exclusion regex matches somewhere in `value`.
    pub fn matches_excluded_regexp(&self, value: &str) -> bool {
        self.excluded_regexps.iter().any(|re| re.is_match(value))
    }

    /// Whether a file path is excluded from directory scans.
    pub fn excludes_file(&self, path: &Path) -> bool {
        self.file_exclusion
            .as_ref()
            .is_some_and(|re| re.is_match(&path.to_string_lossy()))
    }

    pub fn is_enforced(&self, function: &str) -> bool {
        self.enforced_funcs.contains(function)
    }

    /// Capture-group patterns in configured order.
    pub fn capture_groups(&self) -> &[Regex] {
        &self.capture_groups
    }

    pub fn excluded_string_count(&self) -> usize {
        self.excluded_strings.len()
    }

    pub fn excluded_regexp_count(&self) -> usize {
        self.excluded_regexps.len()
    }
}

/// Load and compile the pattern documents.
///
/// `None` or a path that does not exist contributes an empty document.
pub fn load(excluded: Option<&Path>, substrings: Option<&Path>) -> Result<PatternSet, PatternError> {
    let excluded_doc: ExcludedStrings = read_document(excluded)?.unwrap_or_default();
    let substring_doc: CaptureGroupSubstrings = read_document(substrings)?.unwrap_or_default();

    let patterns = PatternSet::from_documents(excluded_doc, substring_doc);
    info!(
        excluded_strings = patterns.excluded_string_count(),
        excluded_regexps = patterns.excluded_regexp_count(),
        capture_groups = patterns.capture_groups().len(),
        "loaded patterns"
    );
    Ok(patterns)
}

fn read_document<T: DeserializeOwned>(path: Option<&Path>) -> Result<Option<T>, PatternError> {
    let Some(path) = path else {
        return Ok(None);
    };

    if !path.exists() {
        info!(path = %path.display(), "could not find pattern document");
        return Ok(None);
    }

    let content = fs::read_to_string(path).map_err(|source| PatternError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content)
        .map(Some)
        .map_err(|source| PatternError::Malformed {
            path: path.to_path_buf(),
            source,
        })
}

fn compile_all(patterns: &[String], what: &str) -> Vec<Regex> {
    patterns
        .iter()
        .filter_map(|pattern| match Regex::new(pattern) {
            Ok(re) => Some(re),
            Err(e) => {
                warn!(pattern = %pattern, error = %e, "skipping invalid {what} regexp");
                None
            }
        })
        .collect()
}
