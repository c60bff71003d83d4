//! Ingest pipeline: validate → decode → crop → compress → dedup/store.
//!
//! Decoding, cropping and compression are CPU-bound and run on the blocking
//! pool. Independent ingests share nothing but the object store.

use std::sync::Arc;
use std::time::Instant;

use atelier_core::validation::{validate_upload, UploadRules};
use atelier_core::{
    log_error, CompressionSettings, Config, DigestAlgorithm, ProcessedAsset, RawAsset,
    StoredObjectReference,
};
use atelier_storage::{Storage, UploadContext};

use crate::compression::IterativeCompressor;
use crate::crop::decode_and_crop;
use crate::dedup::Deduplicator;
use crate::digest::ContentDigest;
use crate::error::UploadError;
use crate::progress::{ProgressEvent, ProgressSender};
use crate::retry::{retry_until, RetryOutcome, RetryPolicy};

/// Reduce a caller-supplied file name to a safe final path segment.
pub fn sanitize_file_name(file_name: &str) -> String {
    const MAX: usize = 255;
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    if base.contains("..") {
        return "invalid_filename".to_string();
    }
    let s: String = base
        .chars()
        .take(MAX)
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if s.trim_matches('_').is_empty() {
        "file".to_string()
    } else {
        s
    }
}

pub struct IngestPipeline {
    storage: Arc<dyn Storage>,
    compressor: Arc<IterativeCompressor>,
    deduplicator: Deduplicator,
    rules: Option<UploadRules>,
    progress: Option<ProgressSender>,
    availability_check: Option<RetryPolicy>,
}

impl IngestPipeline {
    pub fn new(storage: Arc<dyn Storage>, settings: CompressionSettings) -> Self {
        Self {
            deduplicator: Deduplicator::new(Arc::clone(&storage), DigestAlgorithm::default()),
            storage,
            compressor: Arc::new(IterativeCompressor::new(settings)),
            rules: None,
            progress: None,
            availability_check: None,
        }
    }

    /// Pipeline with compression, digest and upload rules taken from `config`
    pub fn from_config(storage: Arc<dyn Storage>, config: &Config) -> Self {
        Self::new(storage, config.compression.clone())
            .with_digest_algorithm(config.digest_algorithm)
            .with_upload_rules(UploadRules::from_config(config))
    }

    pub fn with_digest_algorithm(mut self, algorithm: DigestAlgorithm) -> Self {
        self.deduplicator = Deduplicator::new(Arc::clone(&self.storage), algorithm);
        self
    }

    /// Reject files that break `rules` before any decoding happens.
    pub fn with_upload_rules(mut self, rules: UploadRules) -> Self {
        self.rules = Some(rules);
        self
    }

    pub fn with_progress(mut self, progress: ProgressSender) -> Self {
        self.progress = Some(progress);
        self
    }

    /// After a fresh upload, poll `exists` until the object is readable.
    /// Giving up is logged and does not fail the ingest.
    pub fn with_availability_check(mut self, policy: RetryPolicy) -> Self {
        self.availability_check = Some(policy);
        self
    }

    pub fn settings(&self) -> &CompressionSettings {
        self.compressor.settings()
    }

    /// Public boundary: the stored object's address, or `None` on any failure.
    ///
    /// The failure kind is only logged.
    pub async fn ingest_url(&self, asset: RawAsset, context: &UploadContext) -> Option<String> {
        match self.ingest(asset, context).await {
            Ok(stored) => Some(stored.public_url),
            Err(e) => {
                log_error(&e, "ingest");
                None
            }
        }
    }

    pub async fn ingest(
        &self,
        asset: RawAsset,
        context: &UploadContext,
    ) -> Result<StoredObjectReference, UploadError> {
        let start = Instant::now();
        let file_name = sanitize_file_name(&asset.file_name);

        tracing::debug!(
            file_name = %file_name,
            folder = %context.folder(),
            content_type = %asset.content_type,
            size_bytes = asset.size_bytes(),
            "Starting image ingest"
        );

        let result = self.run(asset, &file_name, context).await;

        match &result {
            Ok(stored) => tracing::info!(
                path = %stored.path,
                reused = stored.reused,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Image ingest complete"
            ),
            Err(e) => self.emit(ProgressEvent::Failed { kind: e.kind() }),
        }

        result
    }

    async fn run(
        &self,
        asset: RawAsset,
        file_name: &str,
        context: &UploadContext,
    ) -> Result<StoredObjectReference, UploadError> {
        if let Some(rules) = &self.rules {
            validate_upload(rules, &asset.file_name, &asset.content_type, asset.size_bytes())?;
        }

        self.emit(ProgressEvent::Decoding);
        let processed = self.process(asset).await?;

        let target_max_bytes = self.compressor.settings().target_max_bytes;
        self.emit(ProgressEvent::Compressed {
            size_bytes: processed.size_bytes(),
            attempts: processed.attempts(),
            within_budget: processed.size_bytes() <= target_max_bytes,
        });

        let digest = ContentDigest::compute(self.deduplicator.algorithm(), processed.data());
        self.emit(ProgressEvent::Deduplicating {
            digest: digest.to_string(),
        });

        let stored = self
            .deduplicator
            .store_with_digest(&processed, &digest, context, file_name)
            .await?;

        if stored.reused {
            self.emit(ProgressEvent::Reused {
                path: stored.path.clone(),
            });
        } else {
            if let Some(policy) = &self.availability_check {
                self.wait_until_available(&stored.path, policy).await;
            }
            self.emit(ProgressEvent::Uploaded {
                path: stored.path.clone(),
            });
        }

        Ok(stored)
    }

    /// Decode, crop and compress off the async runtime.
    async fn process(&self, asset: RawAsset) -> Result<ProcessedAsset, UploadError> {
        let compressor = Arc::clone(&self.compressor);
        let progress = self.progress.clone();
        let data = asset.data;

        tokio::task::spawn_blocking(move || -> Result<ProcessedAsset, UploadError> {
            let square = decode_and_crop(&data)?;
            if let Some(progress) = &progress {
                progress.send(ProgressEvent::Cropped {
                    side: square.width(),
                });
            }

            compressor.compress_with(&square, |report| {
                if let Some(progress) = &progress {
                    progress.send(ProgressEvent::CompressionAttempt {
                        attempt: report.attempt,
                        quality: report.quality,
                        max_dimension: report.max_dimension,
                        size_bytes: report.size_bytes,
                    });
                }
            })
        })
        .await
        .map_err(|e| UploadError::Compression(format!("Image processing task failed: {}", e)))?
    }

    async fn wait_until_available(&self, path: &str, policy: &RetryPolicy) {
        let storage = &self.storage;
        let outcome = retry_until(
            policy,
            |_| async move { storage.exists(path).await },
            |exists| matches!(exists, Ok(true)),
        )
        .await;

        match outcome {
            RetryOutcome::Satisfied { attempts, .. } => {
                tracing::debug!(path = %path, attempts = attempts, "Uploaded object is available")
            }
            RetryOutcome::Exhausted { last, attempts } => tracing::warn!(
                path = %path,
                attempts = attempts,
                error = ?last.err(),
                "Uploaded object not yet available"
            ),
        }
    }

    fn emit(&self, event: ProgressEvent) {
        if let Some(progress) = &self.progress {
            progress.send(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_keeps_ordinary_names() {
        assert_eq!(sanitize_file_name("sunset.jpg"), "sunset.jpg");
        assert_eq!(sanitize_file_name("my photo (1).JPG"), "my_photo__1_.JPG");
    }

    #[test]
    fn sanitize_strips_directories_and_traversal() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\Users\\me\\art.png"), "art.png");
        assert_eq!(sanitize_file_name("..jpg"), "invalid_filename");
        assert_eq!(sanitize_file_name(""), "file");
        assert_eq!(sanitize_file_name("日本"), "file");
        assert_eq!(sanitize_file_name("___"), "file");
    }

    #[test]
    fn sanitize_keeps_short_names() {
        assert_eq!(sanitize_file_name("ab"), "ab");
        assert_eq!(sanitize_file_name("a"), "a");
    }
}
