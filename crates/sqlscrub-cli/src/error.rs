//! Error types for the command-line tool.

use std::path::PathBuf;

/// Errors that can occur while scrubbing a directory of SQL files.
#[derive(Debug, thiserror::Error)]
pub enum ScrubError {
    /// The directory to scan does not exist or is not a directory.
    #[error("Directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    /// No target tables were given on the command line or in a file.
    #[error("No target tables given; pass table names or --tables-file")]
    NoTables,

    /// The tables file could not be found.
    #[error("Tables file not found: {0}")]
    TablesFileNotFound(PathBuf),

    /// IO error while reading or writing a SQL file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the tool.
pub type Result<T> = std::result::Result<T, ScrubError>;
