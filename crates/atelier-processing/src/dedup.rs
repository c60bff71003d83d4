//! Content-addressed deduplication against the object store.
//!
//! Before uploading, the target folder is listed and any object whose name
//! contains the digest is reused. Identical processed bytes sent twice to one
//! folder therefore resolve to one stored object and one address.
//!
//! The check is a folder scan, so two concurrent writers of the same digest can
//! both miss. The upload refuses to overwrite, which turns the loser of that
//! race into an [`UploadError::Upload`] instead of a second copy.

use std::sync::Arc;

use atelier_core::{DigestAlgorithm, ProcessedAsset, StoredObjectReference};
use atelier_storage::{Storage, UploadContext};

use crate::digest::ContentDigest;
use crate::error::UploadError;

pub struct Deduplicator {
    storage: Arc<dyn Storage>,
    algorithm: DigestAlgorithm,
}

impl Deduplicator {
    pub fn new(storage: Arc<dyn Storage>, algorithm: DigestAlgorithm) -> Self {
        Self { storage, algorithm }
    }

    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    /// Digest `asset`, then reuse or upload it inside `context`'s folder.
    pub async fn store(
        &self,
        asset: &ProcessedAsset,
        context: &UploadContext,
        file_name: &str,
    ) -> Result<StoredObjectReference, UploadError> {
        let digest = ContentDigest::compute(self.algorithm, asset.data());
        self.store_with_digest(asset, &digest, context, file_name)
            .await
    }

    /// Same as [`store`](Self::store) with a digest the caller already computed.
    ///
    /// A listing failure aborts before any upload is attempted.
    pub async fn store_with_digest(
        &self,
        asset: &ProcessedAsset,
        digest: &ContentDigest,
        context: &UploadContext,
        file_name: &str,
    ) -> Result<StoredObjectReference, UploadError> {
        let folder = context.folder();

        let existing = self
            .storage
            .list(folder)
            .await
            .map_err(|source| UploadError::List {
                folder: folder.to_string(),
                source,
            })?;

        if let Some(entry) = existing
            .iter()
            .find(|entry| entry.name.contains(digest.as_str()))
        {
            tracing::info!(
                folder = %folder,
                path = %entry.path,
                digest = %digest,
                "Reusing stored object with matching digest"
            );
            return Ok(StoredObjectReference {
                public_url: self.storage.public_url(&entry.path),
                path: entry.path.clone(),
                reused: true,
            });
        }

        let path = context.object_path(digest.as_str(), file_name);
        let stored_path = self
            .storage
            .upload(&path, asset.data().clone(), asset.content_type(), false)
            .await
            .map_err(|source| UploadError::Upload {
                path: path.clone(),
                source,
            })?;

        tracing::info!(
            folder = %folder,
            path = %stored_path,
            digest = %digest,
            size_bytes = asset.size_bytes(),
            "Stored new object"
        );

        Ok(StoredObjectReference {
            public_url: self.storage.public_url(&stored_path),
            path: stored_path,
            reused: false,
        })
    }
}
