//! Structural failures raised while translating one shader.
//!
//! Offsets are byte offsets into the *massaged* text, i.e. after comments
//! were stripped and whitespace collapsed.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    #[error("expected `;` after declaration at byte {offset}, found `{found}`")]
    UnexpectedTerminator { found: String, offset: usize },

    #[error("expected `{expected}` at byte {offset}, found `{found}`")]
    MismatchedDelimiter {
        expected: char,
        found: String,
        offset: usize,
    },

    #[error("parameter list starting at byte {offset} has no closing `)`")]
    UnterminatedParameterList { offset: usize },

    #[error("block starting at byte {offset} has no matching `}}`")]
    UnterminatedBlock { offset: usize },

    #[error("cannot build matrix multiply rewrite for {names:?}: {reason}")]
    MatrixRewritePattern { names: Vec<String>, reason: String },

    #[error("shader has no `main` entry point")]
    MissingEntryPoint,

    #[error("unsupported file extension for {}, expected .vp or .fp", path.display())]
    UnsupportedFileExtension { path: PathBuf },
}
