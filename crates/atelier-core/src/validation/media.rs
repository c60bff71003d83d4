use std::path::Path;

use super::ValidationError;

/// Limits an uploaded image must satisfy before it enters the pipeline
#[derive(Debug, Clone)]
pub struct UploadRules {
    pub max_file_size: usize,
    pub allowed_extensions: Vec<String>,
    pub allowed_content_types: Vec<String>,
}

impl UploadRules {
    pub fn from_config(config: &crate::Config) -> Self {
        Self {
            max_file_size: config.max_file_size_bytes,
            allowed_extensions: config.allowed_extensions.clone(),
            allowed_content_types: config.allowed_content_types.clone(),
        }
    }
}

/// Lowercased extension of `filename`, if it has one
pub fn file_extension(filename: &str) -> Result<String, ValidationError> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .ok_or_else(|| ValidationError::InvalidFilename(filename.to_string()))
}

pub fn validate_file_size(size: usize, max: usize) -> Result<usize, ValidationError> {
    if size == 0 {
        return Err(ValidationError::EmptyFile);
    }

    if size > max {
        return Err(ValidationError::FileTooLarge { size, max });
    }

    Ok(size)
}

pub fn validate_extension(filename: &str, allowed: &[String]) -> Result<String, ValidationError> {
    let extension = file_extension(filename)?;

    if !allowed.contains(&extension) {
        return Err(ValidationError::InvalidExtension {
            extension,
            allowed: allowed.to_vec(),
        });
    }

    Ok(extension)
}

pub fn validate_content_type(
    content_type: &str,
    allowed: &[String],
) -> Result<String, ValidationError> {
    let normalized = content_type.trim().to_lowercase();

    if !allowed.iter().any(|ct| ct == &normalized) {
        return Err(ValidationError::InvalidContentType {
            content_type: content_type.to_string(),
            allowed: allowed.to_vec(),
        });
    }

    Ok(normalized)
}

/// Content type a browser or OS reports for an image extension
pub fn expected_content_type(extension: &str) -> Option<&'static str> {
    match extension {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "avif" => Some("image/avif"),
        "bmp" => Some("image/bmp"),
        "heic" => Some("image/heic"),
        _ => None,
    }
}

/// Reject a content type that disagrees with the file extension.
///
/// Unknown extensions skip the cross-check; the individual extension check
/// still applies to them.
pub fn validate_extension_content_type_match(
    filename: &str,
    content_type: &str,
) -> Result<(), ValidationError> {
    let extension = file_extension(filename)?;
    let normalized = content_type.trim().to_lowercase();

    let Some(expected) = expected_content_type(&extension) else {
        tracing::debug!(
            extension = %extension,
            content_type = %content_type,
            "Unknown extension, skipping Content-Type/extension cross-validation"
        );
        return Ok(());
    };

    if expected != normalized {
        return Err(ValidationError::ContentTypeMismatch {
            extension,
            content_type: content_type.to_string(),
        });
    }

    Ok(())
}

/// Run every upload check in order: size, extension, content type, agreement.
pub fn validate_upload(
    rules: &UploadRules,
    filename: &str,
    content_type: &str,
    size: usize,
) -> Result<(), ValidationError> {
    validate_file_size(size, rules.max_file_size)?;
    validate_extension(filename, &rules.allowed_extensions)?;
    validate_content_type(content_type, &rules.allowed_content_types)?;
    validate_extension_content_type_match(filename, content_type)?;
    Ok(())
}
