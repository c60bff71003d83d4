#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-s3")]
use crate::S3Storage;
use crate::{MemoryStorage, Storage, StorageBackend, StorageError, StorageResult};
use atelier_core::Config;
use std::sync::Arc;

const DEFAULT_MEMORY_BASE_URL: &str = "http://localhost:3000/media";

/// Create a storage backend based on configuration
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    let backend = config.storage_backend();

    tracing::debug!(backend = %backend, "Creating storage backend");

    match backend {
        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => {
            let bucket = config
                .s3_bucket()
                .map(String::from)
                .ok_or_else(|| StorageError::ConfigError("S3_BUCKET not configured".to_string()))?;
            let region = config
                .s3_region()
                .map(String::from)
                .or_else(|| config.aws_region().map(String::from))
                .ok_or_else(|| {
                    StorageError::ConfigError("S3_REGION or AWS_REGION not configured".to_string())
                })?;
            let endpoint = config.s3_endpoint().map(String::from);

            let storage = S3Storage::new(bucket, region, endpoint)?
                .with_public_base_url(config.public_base_url().map(String::from));
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageBackend::S3 => Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let base_path = config
                .local_storage_path()
                .map(String::from)
                .ok_or_else(|| {
                    StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
                })?;
            let base_url = config
                .local_storage_base_url()
                .map(String::from)
                .ok_or_else(|| {
                    StorageError::ConfigError("LOCAL_STORAGE_BASE_URL not configured".to_string())
                })?;

            let storage = LocalStorage::new(base_path, base_url).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),

        StorageBackend::Memory => {
            let base_url = config
                .public_base_url()
                .unwrap_or(DEFAULT_MEMORY_BASE_URL)
                .to_string();
            Ok(Arc::new(MemoryStorage::new(base_url)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_backend_uses_public_base_url() {
        let config = Config {
            storage_backend: StorageBackend::Memory,
            public_base_url: Some("https://cdn.example.com/art".to_string()),
            ..Default::default()
        };

        let storage = create_storage(&config).await.unwrap();
        assert_eq!(storage.backend_type(), StorageBackend::Memory);
        assert_eq!(storage.public_url("a/b.jpg"), "https://cdn.example.com/art/a/b.jpg");
    }

    #[tokio::test]
    async fn local_backend_requires_path() {
        let config = Config::default();
        let result = create_storage(&config).await;
        assert!(matches!(result, Err(StorageError::ConfigError(_))));
    }

    #[cfg(feature = "storage-local")]
    #[tokio::test]
    async fn local_backend_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            local_storage_path: Some(dir.path().to_string_lossy().into_owned()),
            local_storage_base_url: Some("http://localhost:3000/media".to_string()),
            ..Default::default()
        };

        let storage = create_storage(&config).await.unwrap();
        assert_eq!(storage.backend_type(), StorageBackend::Local);
    }

    #[cfg(feature = "storage-s3")]
    #[tokio::test]
    async fn s3_backend_requires_region() {
        let config = Config {
            storage_backend: StorageBackend::S3,
            s3_bucket: Some("artworks".to_string()),
            ..Default::default()
        };
        let result = create_storage(&config).await;
        assert!(matches!(result, Err(StorageError::ConfigError(_))));
    }
}
