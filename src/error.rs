//! Error type for building and checking upload request documents.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while assembling or verifying an `UploadFileFromMap` request.
///
/// I/O variants carry the offending path so the CLI can report it as-is.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The input file is missing or could not be read
    #[error("Failed to read input file {path}: {source}")]
    InputRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The request document could not be written
    #[error("Failed to write request document {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The document parsed as JSON but does not have the expected shape
    #[error("Malformed request document: {0}")]
    MalformedDocument(String),

    #[error("Unexpected GraphQL operation: {0}")]
    UnexpectedQuery(String),

    #[error("file_data is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("size_bytes is {declared} but file_data decodes to {actual} bytes")]
    SizeMismatch { declared: u64, actual: u64 },

    #[error("content_hash is {declared} but file_data hashes to {actual}")]
    HashMismatch { declared: String, actual: String },
}

impl RequestError {
    /// True when the input file does not exist at all
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::InputRead { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}
