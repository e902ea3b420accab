//! Error types for strextract.

use std::path::PathBuf;

use crate::output::OutputError;
use crate::patterns::PatternError;
use crate::syntax::SyntaxError;
use crate::walker::WalkError;

/// Top-level error type for extraction runs.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Pattern(#[from] PatternError),

    #[error("{0}")]
    Syntax(#[from] SyntaxError),

    #[error("walk error: {0}")]
    Walk(#[from] WalkError),

    #[error("output error: {0}")]
    Output(#[from] OutputError),
}

/// Map an error to its exit code.
pub fn exit_code(error: &ExtractError) -> i32 {
    match error {
        ExtractError::PathNotFound(_) => 3,
        ExtractError::Io(_) => 1,
        ExtractError::Pattern(_) => 4,
        ExtractError::Syntax(_) => 5,
        ExtractError::Walk(_) => 2,
        ExtractError::Output(_) => 1,
    }
}
