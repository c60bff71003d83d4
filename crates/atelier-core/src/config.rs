//! Configuration module
//!
//! Storage backend selection, compression tunables and upload validation limits,
//! all read from the environment (with `.env` support).

use std::env;

use crate::settings::{
    CompressionSettings, DigestAlgorithm, OutputFormat, DEFAULT_DIMENSION_STEP,
    DEFAULT_INITIAL_MAX_DIMENSION, DEFAULT_INITIAL_QUALITY, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_QUALITY_STEP, DEFAULT_TARGET_MAX_BYTES,
};
use crate::storage_types::StorageBackend;

const MAX_FILE_SIZE_MB: usize = 10;
const DEFAULT_ALLOWED_EXTENSIONS: &str = "jpg,jpeg,png,gif,webp";
const DEFAULT_ALLOWED_CONTENT_TYPES: &str = "image/jpeg,image/png,image/gif,image/webp";

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub environment: String,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, Supabase storage, etc.)
    pub aws_region: Option<String>,
    pub public_base_url: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Image ingestion
    pub compression: CompressionSettings,
    pub digest_algorithm: DigestAlgorithm,
    // Upload validation
    pub max_file_size_bytes: usize,
    pub allowed_extensions: Vec<String>,
    pub allowed_content_types: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            storage_backend: StorageBackend::Local,
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            aws_region: None,
            public_base_url: None,
            local_storage_path: None,
            local_storage_base_url: None,
            compression: CompressionSettings::default(),
            digest_algorithm: DigestAlgorithm::default(),
            max_file_size_bytes: MAX_FILE_SIZE_MB * 1024 * 1024,
            allowed_extensions: split_list(DEFAULT_ALLOWED_EXTENSIONS),
            allowed_content_types: split_list(DEFAULT_ALLOWED_CONTENT_TYPES),
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

impl Config {
    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(value) => value.parse::<StorageBackend>()?,
            Err(_) => StorageBackend::Local,
        };

        let max_file_size_mb = env::var("MAX_FILE_SIZE_MB")
            .unwrap_or_else(|_| MAX_FILE_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_FILE_SIZE_MB);

        let output_format = match env::var("UPLOAD_OUTPUT_FORMAT") {
            Ok(value) => value.parse::<OutputFormat>()?,
            Err(_) => OutputFormat::Jpeg,
        };

        let digest_algorithm = match env::var("UPLOAD_DIGEST_ALGORITHM") {
            Ok(value) => value.parse::<DigestAlgorithm>()?,
            Err(_) => DigestAlgorithm::Sha1,
        };

        let compression = CompressionSettings {
            target_max_bytes: env::var("UPLOAD_TARGET_MAX_BYTES")
                .unwrap_or_else(|_| DEFAULT_TARGET_MAX_BYTES.to_string())
                .parse()
                .unwrap_or(DEFAULT_TARGET_MAX_BYTES),
            initial_quality: env::var("UPLOAD_INITIAL_QUALITY")
                .unwrap_or_else(|_| DEFAULT_INITIAL_QUALITY.to_string())
                .parse()
                .unwrap_or(DEFAULT_INITIAL_QUALITY),
            quality_step: env::var("UPLOAD_QUALITY_STEP")
                .unwrap_or_else(|_| DEFAULT_QUALITY_STEP.to_string())
                .parse()
                .unwrap_or(DEFAULT_QUALITY_STEP),
            initial_max_dimension: env::var("UPLOAD_INITIAL_MAX_DIMENSION")
                .unwrap_or_else(|_| DEFAULT_INITIAL_MAX_DIMENSION.to_string())
                .parse()
                .unwrap_or(DEFAULT_INITIAL_MAX_DIMENSION),
            dimension_step: env::var("UPLOAD_DIMENSION_STEP")
                .unwrap_or_else(|_| DEFAULT_DIMENSION_STEP.to_string())
                .parse()
                .unwrap_or(DEFAULT_DIMENSION_STEP),
            max_attempts: env::var("UPLOAD_MAX_ATTEMPTS")
                .unwrap_or_else(|_| DEFAULT_MAX_ATTEMPTS.to_string())
                .parse()
                .unwrap_or(DEFAULT_MAX_ATTEMPTS),
            output_format,
        };

        Ok(Config {
            environment,
            storage_backend,
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_region: env::var("S3_REGION").ok(),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            aws_region: env::var("AWS_REGION").ok(),
            public_base_url: env::var("PUBLIC_BASE_URL").ok(),
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok(),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL").ok(),
            compression,
            digest_algorithm,
            max_file_size_bytes: max_file_size_mb * 1024 * 1024,
            allowed_extensions: split_list(
                &env::var("ALLOWED_EXTENSIONS")
                    .unwrap_or_else(|_| DEFAULT_ALLOWED_EXTENSIONS.to_string()),
            ),
            allowed_content_types: split_list(
                &env::var("ALLOWED_CONTENT_TYPES")
                    .unwrap_or_else(|_| DEFAULT_ALLOWED_CONTENT_TYPES.to_string()),
            ),
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.compression.validate()?;

        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() && self.aws_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
                if self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using local storage backend"
                    ));
                }
            }
            StorageBackend::Memory => {
                if self.is_production() {
                    return Err(anyhow::anyhow!(
                        "Memory storage backend cannot be used in production"
                    ));
                }
            }
        }

        Ok(())
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.s3_endpoint.as_deref()
    }

    pub fn aws_region(&self) -> Option<&str> {
        self.aws_region.as_deref()
    }

    pub fn public_base_url(&self) -> Option<&str> {
        self.public_base_url.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.local_storage_base_url.as_deref()
    }
}
