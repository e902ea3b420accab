//! Extraction sessions.
//!
//! A session owns everything one run needs: the compiled patterns, the
//! aggregate result set and the running counters. Sessions share no state,
//! so independent runs can proceed side by side.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use regex::Regex;
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::ExtractError;
use crate::extract::extract_path;
use crate::patterns::PatternSet;
use crate::results::ResultSet;
use crate::syntax::SyntaxError;
use crate::walker::{go_files, WalkOptions};

/// Running counters for a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub files_processed: usize,
    pub files_failed: usize,
    /// Sum of per-file string counts.
    pub strings_extracted: usize,
}

/// Strings extracted from one file.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    pub strings: ResultSet,
}

/// A file that could not be extracted during a directory scan.
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: SyntaxError,
}

/// Outcome of a directory scan.
#[derive(Debug, Default)]
pub struct DirReport {
    pub files: Vec<FileReport>,
    pub failures: Vec<FileFailure>,
}

/// State of one extraction run.
///
/// # Examples
///
/// ```no_run
/// use strextract::patterns::PatternSet;
/// use strextract::session::ExtractionSession;
///
/// let mut session = ExtractionSession::new(PatternSet::default()).recursive(true);
/// let report = session.inspect_dir("./cmd".as_ref()).unwrap();
/// println!("{} files, {} unique strings", report.files.len(), session.results().len());
/// ```
#[derive(Debug)]
pub struct ExtractionSession {
    patterns: PatternSet,
    ignore: Option<Regex>,
    walk_options: WalkOptions,
    results: ResultSet,
    stats: RunStats,
}

impl ExtractionSession {
    pub fn new(patterns: PatternSet) -> Self {
        Self {
            patterns,
            ignore: None,
            walk_options: WalkOptions::default(),
            results: ResultSet::new(),
            stats: RunStats::default(),
        }
    }

    /// Descend into subdirectories during directory scans.
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.walk_options.max_depth = if recursive { None } else { Some(1) };
        self
    }

    /// Skip files whose path matches `pattern` during directory scans.
    pub fn ignore_regexp(mut self, pattern: Regex) -> Self {
        self.ignore = Some(pattern);
        self
    }

    /// Replace the directory walk options.
    pub fn walk_options(mut self, options: WalkOptions) -> Self {
        self.walk_options = options;
        self
    }

    pub fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    /// Strings extracted so far, merged across files.
    pub fn results(&self) -> &ResultSet {
        &self.results
    }

    pub fn stats(&self) -> RunStats {
        self.stats
    }

    pub fn into_results(self) -> ResultSet {
        self.results
    }

    /// Extract strings from a single file.
    ///
    /// Hidden files (leading `.`) are skipped and yield `Ok(None)`. Read and
    /// parse failures are returned as errors.
    pub fn inspect_file(&mut self, path: &Path) -> Result<Option<FileReport>, ExtractError> {
        if !path.exists() {
            return Err(ExtractError::PathNotFound(path.to_path_buf()));
        }

        if is_hidden(path) {
            warn!(path = %path.display(), "ignoring hidden file");
            return Ok(None);
        }

        info!(path = %path.display(), "extracting strings from file");
        match extract_path(path, &self.patterns) {
            Ok(strings) => Ok(Some(self.absorb(path.to_path_buf(), strings))),
            Err(e) => {
                self.stats.files_failed += 1;
                Err(e.into())
            }
        }
    }

    /// Extract strings from every `.go` file of a directory.
    ///
    /// Files are parsed and walked in parallel, each into its own result
    /// set; the sets are merged into the session in path order. A file that
    /// fails to read or parse is logged, reported in
    /// [`DirReport::failures`], and does not stop the scan.
    pub fn inspect_dir(&mut self, root: &Path) -> Result<DirReport, ExtractError> {
        if !root.exists() {
            return Err(ExtractError::PathNotFound(root.to_path_buf()));
        }

        info!(
            dir = %root.display(),
            recursive = self.walk_options.max_depth.is_none(),
            "inspecting directory"
        );

        let (files, walk_errors) = go_files(root, &self.walk_options)?;
        for error in &walk_errors {
            warn!(error = %error, "skipping unreadable entry");
        }

        let files: Vec<PathBuf> = files
            .into_iter()
            .filter(|path| self.should_scan(path))
            .collect();

        let patterns = &self.patterns;
        let extracted: Vec<(PathBuf, Result<ResultSet, SyntaxError>)> = files
            .into_par_iter()
            .map(|path| {
                let result = extract_path(&path, patterns);
                (path, result)
            })
            .collect();

        let mut report = DirReport::default();
        for (path, result) in extracted {
            match result {
                Ok(strings) => report.files.push(self.absorb(path, strings)),
                Err(error) => {
                    warn!(path = %path.display(), error = %error, "could not extract strings");
                    self.stats.files_failed += 1;
                    report.failures.push(FileFailure { path, error });
                }
            }
        }

        info!(
            dir = %root.display(),
            files = report.files.len(),
            failed = report.failures.len(),
            "finished directory"
        );
        Ok(report)
    }

    fn should_scan(&self, path: &Path) -> bool {
        let shown = path.to_string_lossy();
        if let Some(ignore) = &self.ignore {
            if ignore.is_match(&shown) {
                info!(path = %shown, pattern = %ignore.as_str(), "skipping file matching ignore-regexp");
                return false;
            }
        }
        if self.patterns.excludes_file(path) {
            info!(path = %shown, "skipping excluded file");
            return false;
        }
        true
    }

    fn absorb(&mut self, path: PathBuf, strings: ResultSet) -> FileReport {
        info!(path = %path.display(), strings = strings.len(), "extracted strings");

        self.stats.files_processed += 1;
        self.stats.strings_extracted += strings.len();
        self.results.merge(strings.clone());

        FileReport { path, strings }
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().starts_with('.'))
}
