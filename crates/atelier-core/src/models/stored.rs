use serde::{Deserialize, Serialize};

/// Object recorded by the remote store for one content digest within a folder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredObjectReference {
    pub path: String,
    pub public_url: String,
    /// True when an existing object with the same digest was returned
    /// instead of uploading a new copy.
    pub reused: bool,
}
