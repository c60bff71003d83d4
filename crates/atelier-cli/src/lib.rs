//! Helpers shared by the `atelier` binary.

use anyhow::bail;
use atelier_core::validation::{expected_content_type, file_extension};
use atelier_storage::keys::sanitize_identity;
use atelier_storage::UploadContext;
use chrono::{NaiveDate, Utc};

/// Build the upload folder from either a raw `folder` or a purpose/identity
/// pair. The identity is sanitized; `date` defaults to today (UTC).
pub fn resolve_context(
    folder: Option<&str>,
    purpose: Option<&str>,
    identity: Option<&str>,
    date: Option<NaiveDate>,
) -> anyhow::Result<UploadContext> {
    match (folder, purpose, identity) {
        (Some(folder), None, None) => Ok(UploadContext::new(folder)),
        (None, Some(purpose), Some(identity)) => {
            let date = date.unwrap_or_else(|| Utc::now().date_naive());
            Ok(UploadContext::for_owner(
                purpose,
                &sanitize_identity(identity),
                date,
            ))
        }
        _ => bail!("Pass either --folder, or --purpose together with --identity"),
    }
}

/// Content type implied by a file name's extension
pub fn content_type_for(file_name: &str) -> &'static str {
    file_extension(file_name)
        .ok()
        .and_then(|ext| expected_content_type(&ext))
        .unwrap_or("application/octet-stream")
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_is_normalized() {
        let ctx = resolve_context(Some("products/x/2024-01-01/"), None, None, None).unwrap();
        assert_eq!(ctx.folder(), "products/x/2024-01-01");
        let ctx = resolve_context(Some("products//x y/2024-01-01"), None, None, None).unwrap();
        assert_eq!(ctx.folder(), "products/x_y/2024-01-01");
    }

    #[test]
    fn identity_is_sanitized_into_dated_folder() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1);
        let ctx = resolve_context(None, Some("products"), Some("alice@example.com"), date).unwrap();
        assert_eq!(ctx.folder(), "products/alice_example_com/2024-01-01");
    }

    #[test]
    fn mixed_or_missing_options_are_rejected() {
        assert!(resolve_context(None, None, None, None).is_err());
        assert!(resolve_context(None, Some("products"), None, None).is_err());
        assert!(resolve_context(Some("f"), Some("products"), Some("a"), None).is_err());
    }

    #[test]
    fn content_type_from_extension() {
        assert_eq!(content_type_for("sunset.JPG"), "image/jpeg");
        assert_eq!(content_type_for("logo.png"), "image/png");
        assert_eq!(content_type_for("notes"), "application/octet-stream");
    }
}
