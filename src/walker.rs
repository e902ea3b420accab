//! Directory traversal.
//!
//! Uses the `ignore` crate to walk source directories. Hidden files and
//! directories are skipped, a `.strextractignore` file at the scan root is
//! honored, and gitignore handling is opt-in.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use thiserror::Error;

/// Name of the ignore file looked up in the scan root.
pub const IGNORE_FILE: &str = ".strextractignore";

/// Errors that can occur during directory walking.
#[derive(Debug, Error)]
pub enum WalkError {
    #[error("path not found: {path}")]
    NotFound { path: PathBuf },

    #[error("permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("symlink loop detected: {path}")]
    SymlinkLoop { path: PathBuf },
}

/// Options for directory walking.
#[derive(Debug, Clone)]
pub struct WalkOptions {
    /// Maximum depth to recurse (None = unlimited, 1 = direct children only).
    pub max_depth: Option<usize>,
    /// Follow symbolic links.
    pub follow_symlinks: bool,
    /// Include hidden files and directories.
    pub include_hidden: bool,
    /// Respect .gitignore patterns.
    pub respect_gitignore: bool,
    /// Additional ignore file paths.
    pub custom_ignores: Vec<PathBuf>,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            max_depth: Some(1),
            follow_symlinks: false,
            include_hidden: false,
            respect_gitignore: false,
            custom_ignores: Vec::new(),
        }
    }
}

impl WalkOptions {
    /// Options that descend into every non-hidden subdirectory.
    pub fn recursive() -> Self {
        Self {
            max_depth: None,
            ..Default::default()
        }
    }

    /// Set maximum depth.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Honor .gitignore, .git/info/exclude and the global gitignore.
    pub fn with_gitignore(mut self) -> Self {
        self.respect_gitignore = true;
        self
    }
}

/// Entry from directory walk.
#[derive(Debug, Clone)]
pub struct WalkEntry {
    /// Path to the entry.
    pub path: PathBuf,
    /// Whether this is a file or directory.
    pub is_file: bool,
}

/// Walk a directory tree with custom options, yielding entries in path order.
///
/// Fails up front when `root` does not exist; errors on individual entries
/// are yielded in place.
pub fn walk(
    root: &Path,
    options: &WalkOptions,
) -> Result<impl Iterator<Item = Result<WalkEntry, WalkError>>, WalkError> {
    if !root.exists() {
        return Err(WalkError::NotFound {
            path: root.to_path_buf(),
        });
    }

    let mut builder = WalkBuilder::new(root);

    builder
        .hidden(!options.include_hidden)
        .parents(options.respect_gitignore)
        .ignore(options.respect_gitignore)
        .git_ignore(options.respect_gitignore)
        .git_global(options.respect_gitignore)
        .git_exclude(options.respect_gitignore)
        .follow_links(options.follow_symlinks)
        .max_depth(options.max_depth)
        .sort_by_file_path(|a, b| a.cmp(b));

    for ignore_path in &options.custom_ignores {
        if ignore_path.exists() {
            builder.add_ignore(ignore_path);
        }
    }

    let root_ignore = root.join(IGNORE_FILE);
    if root_ignore.exists() {
        builder.add_ignore(&root_ignore);
    }

    Ok(builder.build().filter_map(|result| match result {
        Ok(entry) => Some(Ok(WalkEntry {
            path: entry.path().to_path_buf(),
            is_file: entry.file_type().is_some_and(|ft| ft.is_file()),
        })),
        Err(e) => convert_error(e, None).map(Err),
    }))
}

/// Collect the `.go` files below `root`.
///
/// Entry-level errors are returned alongside the files so the caller can
/// report them and carry on.
pub fn go_files(
    root: &Path,
    options: &WalkOptions,
) -> Result<(Vec<PathBuf>, Vec<WalkError>), WalkError> {
    let mut files = Vec::new();
    let mut errors = Vec::new();

    for entry in walk(root, options)? {
        match entry {
            Ok(entry) if entry.is_file && is_go_file(&entry.path) => files.push(entry.path),
            Ok(_) => {}
            Err(e) => errors.push(e),
        }
    }

    Ok((files, errors))
}

pub fn is_go_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "go")
}

// Skips non-IO errors (such as ignore-file parse errors).
fn convert_error(err: ignore::Error, path: Option<PathBuf>) -> Option<WalkError> {
    match err {
        ignore::Error::WithPath { path, err } => convert_error(*err, Some(path)),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            convert_error(*err, path)
        }
        ignore::Error::Loop { child, .. } => Some(WalkError::SymlinkLoop { path: child }),
        ignore::Error::Io(source) => {
            let path = path.unwrap_or_else(|| PathBuf::from("<walk error>"));
            if source.kind() == std::io::ErrorKind::PermissionDenied {
                Some(WalkError::PermissionDenied { path })
            } else {
                Some(WalkError::Io { path, source })
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();

        fs::create_dir_all(dir.path().join("pkg/inner")).unwrap();
        fs::write(dir.path().join("main.go"), "package main").unwrap();
        fs::write(dir.path().join("README.md"), "# readme").unwrap();
        fs::write(dir.path().join("pkg/util.go"), "package pkg").unwrap();
        fs::write(dir.path().join("pkg/inner/deep.go"), "package inner").unwrap();

        dir
    }

    fn names(files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_default_is_single_level() {
        let dir = create_test_dir();
        let (files, errors) = go_files(dir.path(), &WalkOptions::default()).unwrap();

        assert!(errors.is_empty());
        assert_eq!(names(&files), vec!["main.go"]);
    }

    #[test]
    fn test_recursive_walk() {
        let dir = create_test_dir();
        let (files, _) = go_files(dir.path(), &WalkOptions::recursive()).unwrap();

        assert_eq!(names(&files), vec!["main.go", "deep.go", "util.go"]);
    }

    #[test]
    fn test_max_depth() {
        let dir = create_test_dir();
        let options = WalkOptions::recursive().max_depth(2);
        let (files, _) = go_files(dir.path(), &options).unwrap();

        assert_eq!(names(&files), vec!["main.go", "util.go"]);
    }

    #[test]
    fn test_walk_nonexistent() {
        let result = walk(Path::new("/nonexistent/path"), &WalkOptions::default());
        assert!(matches!(result, Err(WalkError::NotFound { .. })));
    }

    #[test]
    fn test_hidden_entries_skipped() {
        let dir = TempDir::new().unwrap();

        fs::create_dir(dir.path().join(".cache")).unwrap();
        fs::write(dir.path().join(".cache/cached.go"), "package cache").unwrap();
        fs::write(dir.path().join(".hidden.go"), "package main").unwrap();
        fs::write(dir.path().join("visible.go"), "package main").unwrap();

        let (files, _) = go_files(dir.path(), &WalkOptions::recursive()).unwrap();
        assert_eq!(names(&files), vec!["visible.go"]);

        let options = WalkOptions {
            include_hidden: true,
            ..WalkOptions::recursive()
        };
        let (files, _) = go_files(dir.path(), &options).unwrap();
        assert_eq!(files.len(), 3);
    }

    #[test]
    fn test_respects_ignore_file() {
        let dir = TempDir::new().unwrap();

        fs::write(dir.path().join("keep.go"), "package main").unwrap();
        fs::write(dir.path().join("skip.go"), "package main").unwrap();
        fs::write(dir.path().join(IGNORE_FILE), "skip.go").unwrap();

        let (files, _) = go_files(dir.path(), &WalkOptions::default()).unwrap();
        assert_eq!(names(&files), vec!["keep.go"]);
    }

    #[test]
    fn test_gitignore_is_opt_in() {
        let dir = TempDir::new().unwrap();

        // Initialize git repo (ignore crate needs this to respect .gitignore)
        fs::create_dir(dir.path().join(".git")).unwrap();
        fs::write(dir.path().join("kept.go"), "package main").unwrap();
        fs::write(dir.path().join("vendored.go"), "package main").unwrap();
        fs::write(dir.path().join(".gitignore"), "vendored.go").unwrap();

        let (files, _) = go_files(dir.path(), &WalkOptions::default()).unwrap();
        assert_eq!(files.len(), 2);

        let (files, _) = go_files(dir.path(), &WalkOptions::default().with_gitignore()).unwrap();
        assert_eq!(names(&files), vec!["kept.go"]);
    }
}
