use crate::keys::object_name;
use crate::traits::{ObjectEntry, Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Name prefix of in-flight upload files; listings skip them.
const STAGING_PREFIX: &str = ".upload-";

static STAGING_SEQ: AtomicU64 = AtomicU64::new(0);

/// Unique sibling of `path` that a write lands in before it is published.
fn staging_path(path: &Path) -> PathBuf {
    let seq = STAGING_SEQ.fetch_add(1, Ordering::Relaxed);
    path.with_file_name(format!(
        "{}{}-{}.tmp",
        STAGING_PREFIX,
        std::process::id(),
        seq
    ))
}

async fn write_synced(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await?;
    file.write_all(data).await?;
    file.sync_all().await
}

/// Local filesystem storage implementation
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "/var/lib/atelier/media")
    /// * `base_url` - Base URL for serving files (e.g., "http://localhost:3000/media")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
        })
    }

    /// Convert storage key to filesystem path with security validation
    ///
    /// Rejects keys with `..` or a leading `/`, and keys that resolve outside
    /// the base directory through existing symlinks.
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        if storage_key.contains("..") || storage_key.starts_with('/') {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }

        let path = self.base_path.join(storage_key);

        let base_canonical = self.base_path.canonicalize().map_err(|e| {
            StorageError::ConfigError(format!("Failed to canonicalize base path: {}", e))
        })?;

        if let Ok(canonical) = path.canonicalize() {
            if canonical.strip_prefix(&base_canonical).is_err() {
                return Err(StorageError::InvalidKey(
                    "Storage key resolves outside storage directory".to_string(),
                ));
            }
        }

        Ok(path)
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn list(&self, folder: &str) -> StorageResult<Vec<ObjectEntry>> {
        let folder = folder.trim_end_matches('/');
        let dir = self.key_to_path(folder)?;

        let mut read_dir = match fs::read_dir(&dir).await {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StorageError::ListFailed(format!(
                    "Failed to read directory {}: {}",
                    dir.display(),
                    e
                )))
            }
        };

        let mut entries = Vec::new();
        while let Some(entry) = read_dir
            .next_entry()
            .await
            .map_err(|e| StorageError::ListFailed(e.to_string()))?
        {
            let metadata = entry
                .metadata()
                .await
                .map_err(|e| StorageError::ListFailed(e.to_string()))?;
            if !metadata.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with(STAGING_PREFIX) {
                continue;
            }
            let path = if folder.is_empty() {
                name.clone()
            } else {
                format!("{}/{}", folder, name)
            };
            entries.push(ObjectEntry {
                name: object_name(&path).to_string(),
                path,
                size_bytes: metadata.len(),
            });
        }

        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }

    async fn upload(
        &self,
        storage_key: &str,
        data: Bytes,
        _content_type: &str,
        overwrite: bool,
    ) -> StorageResult<String> {
        let path = self.key_to_path(storage_key)?;
        let size = data.len();

        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();

        // The object only appears under its final name once fully written:
        // `hard_link` refuses an existing target, `rename` replaces it.
        let staging = staging_path(&path);
        let published = match write_synced(&staging, &data).await {
            Ok(()) => {
                let linked = if overwrite {
                    fs::rename(&staging, &path).await
                } else {
                    fs::hard_link(&staging, &path).await
                };
                linked.map_err(|e| {
                    if e.kind() == ErrorKind::AlreadyExists {
                        StorageError::AlreadyExists(storage_key.to_string())
                    } else {
                        StorageError::UploadFailed(format!(
                            "Failed to publish file {}: {}",
                            path.display(),
                            e
                        ))
                    }
                })
            }
            Err(e) => Err(StorageError::UploadFailed(format!(
                "Failed to write file {}: {}",
                path.display(),
                e
            ))),
        };

        match fs::remove_file(&staging).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                path = %staging.display(),
                error = %e,
                "Failed to remove staging file"
            ),
        }
        published?;

        tracing::info!(
            path = %path.display(),
            key = %storage_key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(storage_key.to_string())
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Bytes> {
        let path = self.key_to_path(storage_key)?;

        match fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StorageError::NotFound(storage_key.to_string()))
            }
            Err(e) => Err(StorageError::DownloadFailed(format!(
                "Failed to read file {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        let path = self.key_to_path(storage_key)?;
        fs::try_exists(&path).await.map_err(|e| {
            StorageError::BackendError(format!("Failed to stat {}: {}", path.display(), e))
        })
    }

    fn public_url(&self, storage_key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), storage_key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
