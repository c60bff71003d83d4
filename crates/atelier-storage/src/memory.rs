use crate::object::{get_object, head_exists, list_folder, put_object};
use crate::traits::{ObjectEntry, Storage, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use object_store::memory::InMemory;
use std::sync::Arc;

/// In-process object store for development and tests.
///
/// Behaves like S3 for listing and conditional writes; contents vanish with the
/// process.
#[derive(Clone)]
pub struct MemoryStorage {
    store: Arc<InMemory>,
    base_url: String,
}

impl MemoryStorage {
    /// * `base_url` - Prefix for public URLs (e.g., "https://cdn.example.com/artworks")
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            store: Arc::new(InMemory::new()),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn list(&self, folder: &str) -> StorageResult<Vec<ObjectEntry>> {
        list_folder(self.store.as_ref(), folder).await
    }

    async fn upload(
        &self,
        path: &str,
        data: Bytes,
        content_type: &str,
        overwrite: bool,
    ) -> StorageResult<String> {
        let size = data.len();
        let location =
            put_object(self.store.as_ref(), path, data, content_type, overwrite).await?;

        tracing::debug!(
            key = %location,
            size_bytes = size,
            "Memory storage upload successful"
        );

        Ok(location)
    }

    async fn download(&self, path: &str) -> StorageResult<Bytes> {
        get_object(self.store.as_ref(), path).await
    }

    async fn exists(&self, path: &str) -> StorageResult<bool> {
        head_exists(self.store.as_ref(), path).await
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StorageError;

    fn storage() -> MemoryStorage {
        MemoryStorage::new("https://cdn.example.test/artworks/")
    }

    #[tokio::test]
    async fn test_upload_then_list_and_download() {
        let storage = storage();
        storage
            .upload("products/a/x_1.jpg", Bytes::from_static(b"one"), "image/jpeg", false)
            .await
            .unwrap();

        let entries = storage.list("products/a").await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "x_1.jpg");
        assert_eq!(entries[0].path, "products/a/x_1.jpg");
        assert_eq!(entries[0].size_bytes, 3);

        let data = storage.download("products/a/x_1.jpg").await.unwrap();
        assert_eq!(data, Bytes::from_static(b"one"));
    }

    #[tokio::test]
    async fn test_upload_returns_listed_location() {
        let storage = storage();
        let stored = storage
            .upload("products//a/x_1.jpg", Bytes::from_static(b"one"), "image/jpeg", false)
            .await
            .unwrap();

        let entries = storage.list("products/a").await.unwrap();
        assert_eq!(stored, "products/a/x_1.jpg");
        assert_eq!(entries[0].path, stored);
    }

    #[tokio::test]
    async fn test_no_overwrite_rejects_existing_object() {
        let storage = storage();
        storage
            .upload("f/a.jpg", Bytes::from_static(b"first"), "image/jpeg", false)
            .await
            .unwrap();

        let result = storage
            .upload("f/a.jpg", Bytes::from_static(b"second"), "image/jpeg", false)
            .await;
        assert!(matches!(result, Err(StorageError::AlreadyExists(_))));

        let data = storage.download("f/a.jpg").await.unwrap();
        assert_eq!(data, Bytes::from_static(b"first"));
    }

    #[tokio::test]
    async fn test_overwrite_replaces_object() {
        let storage = storage();
        storage
            .upload("f/a.jpg", Bytes::from_static(b"first"), "image/jpeg", true)
            .await
            .unwrap();
        storage
            .upload("f/a.jpg", Bytes::from_static(b"second"), "image/jpeg", true)
            .await
            .unwrap();
        let data = storage.download("f/a.jpg").await.unwrap();
        assert_eq!(data, Bytes::from_static(b"second"));
    }

    #[tokio::test]
    async fn test_list_is_not_recursive() {
        let storage = storage();
        storage
            .upload("f/top.jpg", Bytes::from_static(b"1"), "image/jpeg", false)
            .await
            .unwrap();
        storage
            .upload("f/nested/deep.jpg", Bytes::from_static(b"2"), "image/jpeg", false)
            .await
            .unwrap();

        let names: Vec<String> = storage
            .list("f")
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["top.jpg".to_string()]);
        assert!(storage.list("empty/folder").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_exists_and_public_url() {
        let storage = storage();
        assert!(!storage.exists("f/a.jpg").await.unwrap());
        storage
            .upload("f/a.jpg", Bytes::from_static(b"1"), "image/jpeg", false)
            .await
            .unwrap();
        assert!(storage.exists("f/a.jpg").await.unwrap());
        assert_eq!(
            storage.public_url("f/a.jpg"),
            "https://cdn.example.test/artworks/f/a.jpg"
        );
    }

    #[tokio::test]
    async fn test_download_missing_is_not_found() {
        let result = storage().download("missing.jpg").await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }
}
