use std::io;
use thiserror::Error;

/// Error type for encoding detection and transcoding operations.
#[derive(Error, Debug)]
pub enum EncodingError {
    /// IO error while reading or writing a file.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A required argument was empty or missing.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The encoding label is not known.
    #[error("Unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    /// The encoding is known to be unsafe to emit.
    #[error("Insecure encoding: {0}")]
    InsecureEncoding(String),
}

/// Result type alias for encoding operations.
pub type Result<T> = std::result::Result<T, EncodingError>;
