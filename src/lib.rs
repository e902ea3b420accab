//! strextract - Extract translatable string literals from Go source.
//!
//! strextract parses Go files with tree-sitter, walks every string literal,
//! filters out the ones that are not user-facing (import paths, blanks,
//! configured exclusions) and records the rest with their position and the
//! locales named by an attached `locales:` comment.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use strextract::patterns;
//! use strextract::session::ExtractionSession;
//!
//! let patterns = patterns::load(Some(Path::new("excluded.json")), None).unwrap();
//! let mut session = ExtractionSession::new(patterns).recursive(true);
//! session.inspect_dir(Path::new("./cmd")).unwrap();
//!
//! for s in session.results().values() {
//!     println!("{}:{}:{} {:?}", s.filename.display(), s.line, s.column, s.value);
//! }
//! ```
//!
//! # Modules
//!
//! - [`patterns`] - Exclusion and capture-group configuration
//! - [`classify`] - Per-literal accept/reject decisions
//! - [`locales`] - `locales:` comment annotations
//! - [`results`] - Deduplicated result sets and locale merging
//! - [`extract`] - Tree walk over one parsed file
//! - [`syntax`] - Tree-sitter Go parsing helpers
//! - [`walker`] - Directory traversal
//! - [`session`] - Multi-file extraction runs
//! - [`output`] - Translation file writers

pub mod classify;
pub mod errors;
pub mod extract;
pub mod locales;
pub mod logging;
pub mod output;
pub mod patterns;
pub mod results;
pub mod session;
pub mod syntax;
pub mod walker;

pub use classify::{classify, Candidate, Decision, RejectReason};
pub use errors::{exit_code, ExtractError};
pub use extract::{extract_path, extract_source, extract_strings};
pub use output::{OutputError, OutputOptions};
pub use patterns::{PatternError, PatternSet};
pub use results::{merge_locales, ExtractedString, ResultSet};
pub use session::{ExtractionSession, FileReport, RunStats};
pub use syntax::SyntaxError;
pub use walker::{WalkError, WalkOptions};
