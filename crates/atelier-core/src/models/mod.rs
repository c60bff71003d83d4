//! Domain models for the image ingestion pipeline

pub mod asset;
pub mod stored;

pub use asset::{ProcessedAsset, RawAsset};
pub use stored::StoredObjectReference;
