use crate::object::{get_object, head_exists, list_folder, put_object};
use crate::traits::{ObjectEntry, Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::{AmazonS3, AmazonS3Builder};

/// S3 storage implementation
#[derive(Clone)]
pub struct S3Storage {
    store: AmazonS3,
    bucket: String,
    region: String,
    endpoint_url: Option<String>, // Custom endpoint for S3-compatible providers
    public_base_url: Option<String>,
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    pub fn new(bucket: String, region: String, endpoint_url: Option<String>) -> StorageResult<Self> {
        // Credentials come from the environment; bucket and region are explicit.
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region.clone())
            .with_bucket_name(bucket.clone());

        if let Some(ref endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(S3Storage {
            store,
            bucket,
            region,
            endpoint_url,
            public_base_url: None,
        })
    }

    /// Serve public URLs from a CDN or public-bucket gateway instead of the
    /// bucket endpoint.
    pub fn with_public_base_url(mut self, base_url: Option<String>) -> Self {
        self.public_base_url = base_url;
        self
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

/// Public URL for an S3 object
///
/// Precedence: explicit public base URL, then `{endpoint}/{bucket}/{key}`
/// (path-style, for S3-compatible providers), then the AWS virtual-hosted form.
fn s3_object_url(
    key: &str,
    bucket: &str,
    region: &str,
    endpoint_url: Option<&str>,
    public_base_url: Option<&str>,
) -> String {
    if let Some(base) = public_base_url {
        format!("{}/{}", base.trim_end_matches('/'), key)
    } else if let Some(endpoint) = endpoint_url {
        format!("{}/{}/{}", endpoint.trim_end_matches('/'), bucket, key)
    } else {
        format!("https://{}.s3.{}.amazonaws.com/{}", bucket, region, key)
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn list(&self, folder: &str) -> StorageResult<Vec<ObjectEntry>> {
        let start = std::time::Instant::now();

        let entries = list_folder(&self.store, folder).await.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                folder = %folder,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 list failed"
            );
            e
        })?;

        tracing::debug!(
            bucket = %self.bucket,
            folder = %folder,
            object_count = entries.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 list successful"
        );

        Ok(entries)
    }

    async fn upload(
        &self,
        path: &str,
        data: Bytes,
        content_type: &str,
        overwrite: bool,
    ) -> StorageResult<String> {
        let size = data.len() as u64;
        let start = std::time::Instant::now();

        let location = put_object(&self.store, path, data, content_type, overwrite)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %path,
                    size_bytes = size,
                    overwrite = overwrite,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 upload failed"
                );
                e
            })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %location,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(location)
    }

    async fn download(&self, path: &str) -> StorageResult<Bytes> {
        let start = std::time::Instant::now();
        let bytes = get_object(&self.store, path).await?;

        tracing::info!(
            bucket = %self.bucket,
            key = %path,
            size_bytes = bytes.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 download successful"
        );

        Ok(bytes)
    }

    async fn exists(&self, path: &str) -> StorageResult<bool> {
        head_exists(&self.store, path).await
    }

    fn public_url(&self, path: &str) -> String {
        s3_object_url(
            path,
            &self.bucket,
            &self.region,
            self.endpoint_url.as_deref(),
            self.public_base_url.as_deref(),
        )
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
