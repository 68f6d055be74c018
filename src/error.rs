use std::path::PathBuf;

use thiserror::Error;

use crate::engine::EngineError;

/// Error type for this crate
#[derive(Error, Debug)]
pub enum Error {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Invalid file path.")]
    InvalidPath,
    #[error("File path cannot be empty.")]
    EmptyPath,
    #[error("Error identifying file type: {0}")]
    SignatureEngine(#[from] EngineError),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(#[source] std::io::Error),
}

impl Error {
    /// Process exit code reported for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::NotFound(_)
            | Error::InvalidPath
            | Error::EmptyPath
            | Error::SignatureEngine(_)
            | Error::Unexpected(_) => 1,
        }
    }
}

/// Result type for this crate
pub type Result<T> = std::result::Result<T, Error>;
