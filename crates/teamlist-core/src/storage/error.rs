use std::path::PathBuf;

use thiserror::Error;

/// Failure of a whole import or export.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Cannot open roster file {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot create roster file {}: {source}", .path.display())]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot read roster data: {0}")]
    Read(#[source] csv::Error),

    #[error("Cannot write roster data: {0}")]
    Write(#[source] csv::Error),

    #[error("Cannot flush roster data: {0}")]
    Flush(#[from] std::io::Error),
}

/// A single import row that could not be turned into a member.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Line {line}: {kind}")]
pub struct RowError {
    pub line: u64,
    pub kind: RowErrorKind,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowErrorKind {
    #[error("expected at least 4 fields, found {found}")]
    TooFewFields { found: usize },

    #[error("grade `{value}` is not a number")]
    InvalidGrade { value: String },

    #[error("row is not valid UTF-8")]
    InvalidEncoding,
}
