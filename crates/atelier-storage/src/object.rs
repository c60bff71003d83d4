//! Operations shared by the `object_store`-backed storages (S3 and in-memory).

use bytes::Bytes;
use object_store::path::Path;
use object_store::{
    Attribute, Attributes, Error as ObjectStoreError, ObjectStore, ObjectStoreExt, PutMode,
    PutOptions, PutPayload,
};

use crate::keys::object_name;
use crate::traits::{ObjectEntry, StorageError, StorageResult};

pub(crate) async fn list_folder<S: ObjectStore>(
    store: &S,
    folder: &str,
) -> StorageResult<Vec<ObjectEntry>> {
    let prefix = Path::from(folder.trim_end_matches('/'));

    let listing = store
        .list_with_delimiter(Some(&prefix))
        .await
        .map_err(|e| StorageError::ListFailed(e.to_string()))?;

    Ok(listing
        .objects
        .into_iter()
        .map(|meta| {
            let path = meta.location.to_string();
            ObjectEntry {
                name: object_name(&path).to_string(),
                path,
                size_bytes: meta.size as u64,
            }
        })
        .collect())
}

pub(crate) async fn put_object<S: ObjectStore>(
    store: &S,
    path: &str,
    data: Bytes,
    content_type: &str,
    overwrite: bool,
) -> StorageResult<String> {
    let location = Path::from(path);

    let mut attributes = Attributes::new();
    attributes.insert(Attribute::ContentType, content_type.to_string().into());

    let mode = if overwrite {
        PutMode::Overwrite
    } else {
        PutMode::Create
    };
    let options = PutOptions {
        mode,
        attributes,
        ..Default::default()
    };

    store
        .put_opts(&location, PutPayload::from(data), options)
        .await
        .map(|_| location.to_string())
        .map_err(|e| match e {
            ObjectStoreError::AlreadyExists { .. } | ObjectStoreError::Precondition { .. } => {
                StorageError::AlreadyExists(path.to_string())
            }
            other => StorageError::UploadFailed(other.to_string()),
        })
}

pub(crate) async fn get_object<S: ObjectStore>(store: &S, path: &str) -> StorageResult<Bytes> {
    let location = Path::from(path);

    let result = store.get(&location).await.map_err(|e| match e {
        ObjectStoreError::NotFound { .. } => StorageError::NotFound(path.to_string()),
        other => StorageError::DownloadFailed(other.to_string()),
    })?;

    result
        .bytes()
        .await
        .map_err(|e| StorageError::DownloadFailed(e.to_string()))
}

pub(crate) async fn head_exists<S: ObjectStore>(store: &S, path: &str) -> StorageResult<bool> {
    let location = Path::from(path);
    match store.head(&location).await {
        Ok(_) => Ok(true),
        Err(ObjectStoreError::NotFound { .. }) => Ok(false),
        Err(e) => Err(StorageError::BackendError(e.to_string())),
    }
}
