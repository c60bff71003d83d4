//! Ingest failure taxonomy.
//!
//! Every failure carries its kind for logging. The public boundary
//! ([`IngestPipeline::ingest_url`](crate::IngestPipeline::ingest_url)) collapses
//! all of them to `None`.

use std::fmt;

use atelier_core::{ErrorMetadata, LogLevel, ValidationError};
use atelier_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadErrorKind {
    /// Input rejected by upload rules before decoding
    Validation,
    Decode,
    Compression,
    List,
    Upload,
}

impl fmt::Display for UploadErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UploadErrorKind::Validation => "validation_failure",
            UploadErrorKind::Decode => "decode_failure",
            UploadErrorKind::Compression => "compression_failure",
            UploadErrorKind::List => "list_failure",
            UploadErrorKind::Upload => "upload_failure",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Upload rejected: {0}")]
    Validation(#[from] ValidationError),

    #[error("Failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Failed to encode image: {0}")]
    Compression(String),

    #[error("Failed to list folder '{folder}': {source}")]
    List {
        folder: String,
        #[source]
        source: StorageError,
    },

    #[error("Failed to upload '{path}': {source}")]
    Upload {
        path: String,
        #[source]
        source: StorageError,
    },
}

impl UploadError {
    pub fn kind(&self) -> UploadErrorKind {
        match self {
            UploadError::Validation(_) => UploadErrorKind::Validation,
            UploadError::Decode(_) => UploadErrorKind::Decode,
            UploadError::Compression(_) => UploadErrorKind::Compression,
            UploadError::List { .. } => UploadErrorKind::List,
            UploadError::Upload { .. } => UploadErrorKind::Upload,
        }
    }

    /// True when the upload lost a race to a concurrent writer of the same path
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            UploadError::Upload {
                source: StorageError::AlreadyExists(_),
                ..
            }
        )
    }
}

impl ErrorMetadata for UploadError {
    fn error_code(&self) -> &'static str {
        match self.kind() {
            UploadErrorKind::Validation => "VALIDATION_FAILURE",
            UploadErrorKind::Decode => "DECODE_FAILURE",
            UploadErrorKind::Compression => "COMPRESSION_FAILURE",
            UploadErrorKind::List => "LIST_FAILURE",
            UploadErrorKind::Upload => "UPLOAD_FAILURE",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self.kind(), UploadErrorKind::List | UploadErrorKind::Upload)
    }

    fn client_message(&self) -> String {
        match self {
            UploadError::Validation(e) => e.to_string(),
            UploadError::Decode(_) => "invalid image".to_string(),
            _ => "Upload failed, please try again".to_string(),
        }
    }

    fn log_level(&self) -> LogLevel {
        match self.kind() {
            UploadErrorKind::Validation => LogLevel::Debug,
            UploadErrorKind::Decode => LogLevel::Warn,
            UploadErrorKind::Upload if self.is_conflict() => LogLevel::Warn,
            _ => LogLevel::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_failure_shows_invalid_image() {
        let err = UploadError::Decode(image::ImageError::IoError(std::io::Error::other("eof")));
        assert_eq!(err.kind(), UploadErrorKind::Decode);
        assert_eq!(err.client_message(), "invalid image");
        assert_eq!(err.error_code(), "DECODE_FAILURE");
        assert!(!err.is_recoverable());
    }

    #[test]
    fn store_failures_are_generic_and_recoverable() {
        let err = UploadError::List {
            folder: "products/a".to_string(),
            source: StorageError::ListFailed("timeout".to_string()),
        };
        assert_eq!(err.kind(), UploadErrorKind::List);
        assert_eq!(err.client_message(), "Upload failed, please try again");
        assert!(err.is_recoverable());
        assert_eq!(err.log_level(), LogLevel::Error);
    }

    #[test]
    fn lost_race_is_a_conflict() {
        let err = UploadError::Upload {
            path: "f/x_a.jpg".to_string(),
            source: StorageError::AlreadyExists("f/x_a.jpg".to_string()),
        };
        assert!(err.is_conflict());
        assert_eq!(err.log_level(), LogLevel::Warn);
        assert_eq!(err.kind().to_string(), "upload_failure");
    }
}
