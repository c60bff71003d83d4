//! Atelier Processing Library
//!
//! The image ingestion pipeline: square crop, size-budgeted compression,
//! content digest, and deduplicated storage. [`IngestPipeline`] wires the stages
//! together; each stage is also usable on its own.

pub mod compression;
pub mod crop;
pub mod dedup;
pub mod digest;
pub mod error;
pub mod pipeline;
pub mod progress;
pub mod retry;

pub use compression::{AttemptReport, IterativeCompressor};
pub use crop::{crop_to_square, decode_and_crop};
pub use dedup::Deduplicator;
pub use digest::ContentDigest;
pub use error::{UploadError, UploadErrorKind};
pub use pipeline::{sanitize_file_name, IngestPipeline};
pub use progress::{ProgressEvent, ProgressReceiver, ProgressSender};
pub use retry::{retry_until, RetryOutcome, RetryPolicy};
