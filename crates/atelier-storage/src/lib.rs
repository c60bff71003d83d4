//! Atelier Storage Library
//!
//! Storage abstraction and backends for ingested artwork images: S3 (and
//! S3-compatible providers), the local filesystem, and an in-memory store for
//! development and tests.
//!
//! # Storage path format
//!
//! All backends share one layout, built by the [`keys`] module:
//!
//! - **Folder**: `{purpose}/{identity}/{YYYY-MM-DD}`, e.g. `products/alice_example_com/2024-01-01`
//! - **Object**: `{folder}/{digest}_{file_name}`
//!
//! Paths must not contain `..` or a leading `/`. Listing is non-recursive and
//! uploads can refuse to overwrite, which is what content deduplication relies on.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod memory;
pub(crate) mod object;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use atelier_core::StorageBackend;
pub use factory::create_storage;
pub use keys::UploadContext;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use memory::MemoryStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{ObjectEntry, Storage, StorageError, StorageResult};
