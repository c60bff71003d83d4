//! Storage path resolution for ingested assets.
//!
//! Folder format: `{purpose}/{identity}/{YYYY-MM-DD}`.
//! Object format: `{folder}/{digest}_{file_name}`.
//!
//! Resolution is pure string building and does not validate its inputs:
//! callers run identity strings through [`sanitize_identity`] first.

use chrono::NaiveDate;

/// Grouping key that scopes where an asset is stored.
///
/// Supplied fresh per ingest call and only persisted as the folder part of a
/// stored object's path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UploadContext {
    folder: String,
}

impl UploadContext {
    /// Use a caller-built folder string, normalized by [`normalize_folder`].
    pub fn new(folder: impl AsRef<str>) -> Self {
        Self {
            folder: normalize_folder(folder.as_ref()),
        }
    }

    /// Per-purpose, per-owner, per-day folder, e.g. `products/alice_example_com/2024-01-01`.
    pub fn for_owner(purpose: &str, identity: &str, date: NaiveDate) -> Self {
        Self::new(resolve_folder(purpose, identity, date))
    }

    pub fn folder(&self) -> &str {
        &self.folder
    }

    /// Path an object with `digest` and `file_name` gets inside this folder
    pub fn object_path(&self, digest: &str, file_name: &str) -> String {
        resolve_object_path(&self.folder, digest, file_name)
    }
}

/// Replace every character outside `[A-Za-z0-9-]` with `_`.
///
/// `alice@example.com` becomes `alice_example_com`.
pub fn sanitize_identity(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Canonical form of a folder string.
///
/// Empty segments are dropped and every character outside `[A-Za-z0-9._-]`
/// becomes `_`, so the folder survives object-store path encoding and URL
/// building unchanged. `.` and `..` segments become `_`.
pub fn normalize_folder(raw: &str) -> String {
    raw.split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| match segment {
            "." | ".." => "_".to_string(),
            _ => segment
                .chars()
                .map(|c| {
                    if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                        c
                    } else {
                        '_'
                    }
                })
                .collect(),
        })
        .collect::<Vec<String>>()
        .join("/")
}

pub fn resolve_folder(purpose: &str, identity: &str, date: NaiveDate) -> String {
    format!("{}/{}/{}", purpose, identity, date.format("%Y-%m-%d"))
}

pub fn resolve_object_path(folder: &str, digest: &str, file_name: &str) -> String {
    let folder = folder.trim_end_matches('/');
    if folder.is_empty() {
        format!("{}_{}", digest, file_name)
    } else {
        format!("{}/{}_{}", folder, digest, file_name)
    }
}

/// Final segment of a storage path
pub fn object_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn sanitize_identity_replaces_unsafe_characters() {
        assert_eq!(sanitize_identity("alice@example.com"), "alice_example_com");
        assert_eq!(sanitize_identity("../etc/passwd"), "___etc_passwd");
        assert_eq!(sanitize_identity("bob-smith"), "bob-smith");
    }

    #[test]
    fn for_owner_builds_dated_folder() {
        let ctx = UploadContext::for_owner("products", &sanitize_identity("alice@example.com"), day());
        assert_eq!(ctx.folder(), "products/alice_example_com/2024-01-01");
    }

    #[test]
    fn object_path_is_deterministic() {
        let ctx = UploadContext::new("products/alice_example_com/2024-01-01");
        let digest = "a9993e364706816aba3e25717850c26c9cd0d89d";
        let first = ctx.object_path(digest, "sunset.jpg");
        let second = ctx.object_path(digest, "sunset.jpg");
        assert_eq!(first, second);
        assert_eq!(
            first,
            "products/alice_example_com/2024-01-01/a9993e364706816aba3e25717850c26c9cd0d89d_sunset.jpg"
        );
    }

    #[test]
    fn trailing_slash_does_not_double_separator() {
        let ctx = UploadContext::new("avatars/bob/");
        assert_eq!(ctx.folder(), "avatars/bob");
        assert_eq!(ctx.object_path("ff", "me.png"), "avatars/bob/ff_me.png");
        assert_eq!(resolve_object_path("", "ff", "me.png"), "ff_me.png");
    }

    #[test]
    fn folder_is_normalized_to_storage_safe_segments() {
        assert_eq!(
            UploadContext::new("products//alice/2024-01-01").folder(),
            "products/alice/2024-01-01"
        );
        assert_eq!(UploadContext::new("/avatars/bob").folder(), "avatars/bob");
        assert_eq!(
            UploadContext::new("products/al#ice/2024-01-01").folder(),
            "products/al_ice/2024-01-01"
        );
        assert_eq!(normalize_folder("a/../b/./c d"), "a/_/b/_/c_d");
        assert_eq!(normalize_folder("///"), "");
    }

    #[test]
    fn object_name_takes_last_segment() {
        assert_eq!(object_name("a/b/c.jpg"), "c.jpg");
        assert_eq!(object_name("c.jpg"), "c.jpg");
    }
}
