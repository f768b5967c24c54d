use std::path::PathBuf;
use thiserror::Error;

/// Exit status for a command line that clap could not parse.
pub const EXIT_USAGE: u8 = 1;
/// Exit status for unrecoverable setup or storage failures.
pub const EXIT_IO: u8 = 4;

/// Failures reading or writing page files and index files.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The file exists but does not follow the record layout.
    #[error("malformed record in {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },
}

impl StoreError {
    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        StoreError::Malformed { path: path.into(), reason: reason.into() }
    }
}

/// Command line values that parsed but cannot be used.
#[derive(Debug, Error)]
pub enum ArgError {
    #[error("invalid seed url: {0}")]
    SeedUrl(String),

    #[error("invalid page directory: {0}")]
    PageDir(String),

    #[error("thread count must be at least 1")]
    ThreadCount,
}

impl ArgError {
    /// Each validation failure maps to its own process exit status.
    pub fn exit_code(&self) -> u8 {
        match self {
            ArgError::SeedUrl(_) | ArgError::PageDir(_) => 2,
            ArgError::ThreadCount => 3,
        }
    }
}
