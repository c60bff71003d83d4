//! Atelier Core Library
//!
//! Domain models, configuration, error conventions, shared validation and the
//! pricing calculator used by every Atelier crate.

pub mod config;
pub mod error;
pub mod models;
pub mod pricing;
pub mod settings;
pub mod storage_types;
pub mod validation;

// Re-export commonly used types
pub use config::Config;
pub use error::{log_error, ErrorMetadata, LogLevel};
pub use models::{ProcessedAsset, RawAsset, StoredObjectReference};
pub use pricing::{FeeSchedule, FeeTier, PriceQuote, PricingError};
pub use settings::{CompressionSettings, DigestAlgorithm, OutputFormat};
pub use storage_types::StorageBackend;
pub use validation::ValidationError;
