//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Object already exists: {0}")]
    AlreadyExists(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Listing failed: {0}")]
    ListFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// One object directly inside a listed folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectEntry {
    /// Full storage path, e.g. `products/alice/2024-01-01/{digest}_photo.jpg`
    pub path: String,
    /// Final path segment
    pub name: String,
    pub size_bytes: u64,
}

/// Storage abstraction trait
///
/// Every backend (S3, local filesystem, in-memory) implements this so the
/// ingest pipeline never couples to a specific object store.
///
/// **Path format:** paths are `/`-separated, relative, and never contain `..`.
/// See [`crate::keys`] for how ingest paths are built.
#[async_trait]
pub trait Storage: Send + Sync {
    /// List objects directly under `folder` (not recursive).
    ///
    /// A folder with no objects yields an empty list, not an error.
    async fn list(&self, folder: &str) -> StorageResult<Vec<ObjectEntry>>;

    /// Write `data` to `path` and return the path.
    ///
    /// With `overwrite == false` an existing object is left untouched and the
    /// call fails with [`StorageError::AlreadyExists`].
    async fn upload(
        &self,
        path: &str,
        data: Bytes,
        content_type: &str,
        overwrite: bool,
    ) -> StorageResult<String>;

    /// Read an object back
    async fn download(&self, path: &str) -> StorageResult<Bytes>;

    /// Check if an object exists
    async fn exists(&self, path: &str) -> StorageResult<bool>;

    /// Publicly resolvable address of `path`. Pure string construction.
    fn public_url(&self, path: &str) -> String;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
