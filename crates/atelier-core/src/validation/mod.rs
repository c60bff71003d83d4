//! Shared validation for every upload and listing form.
//!
//! Every check is a pure function returning `Result<_, ValidationError>` so the
//! storefront screens, the CLI and the ingest pipeline all reject the same input
//! with the same reason.

pub mod media;
pub mod price;

pub use media::{
    expected_content_type, file_extension, validate_content_type, validate_extension,
    validate_extension_content_type_match, validate_file_size, validate_upload, UploadRules,
};
pub use price::{validate_discount, validate_price, PriceBounds};

use rust_decimal::Decimal;

/// Common validation errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Invalid file extension: {extension} (allowed: {allowed:?})")]
    InvalidExtension {
        extension: String,
        allowed: Vec<String>,
    },

    #[error("Invalid content type: {content_type} (allowed: {allowed:?})")]
    InvalidContentType {
        content_type: String,
        allowed: Vec<String>,
    },

    #[error("Content type {content_type} does not match extension '{extension}'")]
    ContentTypeMismatch {
        extension: String,
        content_type: String,
    },

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("Empty file")]
    EmptyFile,

    #[error("Price must be greater than zero, got {0}")]
    NonPositivePrice(Decimal),

    #[error("Price {price} outside allowed range {min}..={max}")]
    PriceOutOfRange {
        price: Decimal,
        min: Decimal,
        max: Decimal,
    },

    #[error("Discount price {discount} must be below listing price {price}")]
    DiscountNotBelowPrice { discount: Decimal, price: Decimal },
}

impl crate::error::ErrorMetadata for ValidationError {
    fn error_code(&self) -> &'static str {
        match self {
            ValidationError::FileTooLarge { .. } => "FILE_TOO_LARGE",
            ValidationError::InvalidExtension { .. } => "INVALID_EXTENSION",
            ValidationError::InvalidContentType { .. } => "INVALID_CONTENT_TYPE",
            ValidationError::ContentTypeMismatch { .. } => "CONTENT_TYPE_MISMATCH",
            ValidationError::InvalidFilename(_) => "INVALID_FILENAME",
            ValidationError::EmptyFile => "EMPTY_FILE",
            ValidationError::NonPositivePrice(_) => "NON_POSITIVE_PRICE",
            ValidationError::PriceOutOfRange { .. } => "PRICE_OUT_OF_RANGE",
            ValidationError::DiscountNotBelowPrice { .. } => "INVALID_DISCOUNT",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }

    fn client_message(&self) -> String {
        self.to_string()
    }

    fn log_level(&self) -> crate::error::LogLevel {
        crate::error::LogLevel::Debug
    }
}
