//! Key-value asset namespace module
//!
//! The store holds site content under opaque, content-addressed keys of the
//! shape `<stem>.<hash16>.<ext>` where `<hash16>` is the leading 16 hex
//! characters of the blake3 hash of the object's bytes. The namespace is
//! written at deploy time and read-only while serving.

use async_trait::async_trait;
use hyper::body::Bytes;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tokio::fs;

/// Hex length of the hash segment embedded in a storage key.
const KEY_HASH_LEN: usize = 16;

/// Failure of a single asset lookup
///
/// Variants record the internal cause, but callers treat every variant the
/// same way: the request that triggered the lookup answers 404.
#[derive(Debug, Error)]
pub enum AssetError {
    /// The logical path has no manifest entry.
    #[error("no manifest entry for '{path}'")]
    NotMapped { path: String },

    /// The manifest points at a key the namespace does not hold.
    #[error("key '{key}' missing from asset namespace")]
    Missing { key: String },

    /// The namespace backend failed while reading the key.
    #[error("failed to read key '{key}' from asset namespace")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },

    /// The key is not a well-formed content-addressed key.
    #[error("malformed storage key '{key}'")]
    InvalidKey { key: String },

    /// Stored bytes do not match the hash embedded in the key.
    #[error("content hash mismatch for key '{key}'")]
    Integrity { key: String },
}

/// The key-value asset namespace seam
///
/// One implementation serves production (filesystem-backed); tests inject
/// an in-memory one so the responder can be exercised without touching
/// disk.
#[async_trait]
pub trait AssetNamespace: Send + Sync {
    /// Fetch the bytes stored under `key`. Exactly one attempt; any
    /// failure is terminal for the calling request.
    async fn get(&self, key: &str) -> Result<Bytes, AssetError>;
}

/// Filesystem-backed namespace
///
/// Objects live as flat files under a root directory, named by their
/// storage key. Keys may contain `/` for nested prefixes but never `..`
/// or an absolute component.
pub struct FsNamespace {
    root: PathBuf,
}

impl FsNamespace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl AssetNamespace for FsNamespace {
    async fn get(&self, key: &str) -> Result<Bytes, AssetError> {
        if !key_is_clean(key) {
            return Err(AssetError::InvalidKey {
                key: key.to_string(),
            });
        }

        match fs::read(self.root.join(key)).await {
            Ok(bytes) => Ok(Bytes::from(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(AssetError::Missing {
                key: key.to_string(),
            }),
            Err(e) => Err(AssetError::Io {
                key: key.to_string(),
                source: e,
            }),
        }
    }
}

/// Reject keys that could escape the store root.
fn key_is_clean(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with('/')
        && !key.contains('\\')
        && !key.split('/').any(|segment| segment.is_empty() || segment == "..")
}

/// Verify that `bytes` matches the hash segment embedded in `key`
///
/// The hash segment is the second-to-last dot-separated part of the key's
/// file name. A key without one, or with a non-hex one, is malformed.
pub fn verify_content_key(key: &str, bytes: &[u8]) -> Result<(), AssetError> {
    let file_name = key.rsplit('/').next().unwrap_or(key);
    let segments: Vec<&str> = file_name.split('.').collect();
    if segments.len() < 3 {
        return Err(AssetError::InvalidKey {
            key: key.to_string(),
        });
    }

    let embedded = segments[segments.len() - 2];
    if embedded.len() != KEY_HASH_LEN || hex::decode(embedded).is_err() {
        return Err(AssetError::InvalidKey {
            key: key.to_string(),
        });
    }

    let actual = blake3::hash(bytes);
    if embedded == &actual.to_hex().as_str()[..KEY_HASH_LEN] {
        Ok(())
    } else {
        Err(AssetError::Integrity {
            key: key.to_string(),
        })
    }
}

/// Derive the storage key for `logical` content, e.g. for test fixtures:
/// `index.html` + bytes -> `index.<hash16>.html`.
#[cfg(test)]
pub fn content_key(logical: &str, bytes: &[u8]) -> String {
    let hash = blake3::hash(bytes).to_hex().as_str()[..KEY_HASH_LEN].to_string();
    match logical.rsplit_once('.') {
        Some((stem, ext)) => format!("{stem}.{hash}.{ext}"),
        None => format!("{logical}.{hash}.bin"),
    }
}

/// In-memory namespace used by handler and lookup tests.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryNamespace {
    objects: std::collections::HashMap<String, Bytes>,
}

#[cfg(test)]
impl MemoryNamespace {
    pub fn insert(&mut self, key: impl Into<String>, bytes: impl Into<Bytes>) {
        self.objects.insert(key.into(), bytes.into());
    }
}

#[cfg(test)]
#[async_trait]
impl AssetNamespace for MemoryNamespace {
    async fn get(&self, key: &str) -> Result<Bytes, AssetError> {
        self.objects
            .get(key)
            .cloned()
            .ok_or_else(|| AssetError::Missing {
                key: key.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_fs_namespace_roundtrip() {
        let dir = TempDir::new().unwrap();
        let key = content_key("index.html", b"<html>home</html>");
        std::fs::write(dir.path().join(&key), b"<html>home</html>").unwrap();

        let ns = FsNamespace::new(dir.path());
        let bytes = ns.get(&key).await.unwrap();
        assert_eq!(&bytes[..], b"<html>home</html>");
    }

    #[tokio::test]
    async fn test_fs_namespace_nested_key() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("guide")).unwrap();
        let key = format!("guide/{}", content_key("page.html", b"guide"));
        std::fs::write(dir.path().join(&key), b"guide").unwrap();

        let ns = FsNamespace::new(dir.path());
        assert_eq!(&ns.get(&key).await.unwrap()[..], b"guide");
    }

    #[tokio::test]
    async fn test_fs_namespace_miss() {
        let dir = TempDir::new().unwrap();
        let ns = FsNamespace::new(dir.path());
        assert!(matches!(
            ns.get("ghost.0000000000000000.html").await,
            Err(AssetError::Missing { .. })
        ));
    }

    #[tokio::test]
    async fn test_fs_namespace_rejects_traversal() {
        let dir = TempDir::new().unwrap();
        let ns = FsNamespace::new(dir.path());
        for key in ["../etc/passwd", "/etc/passwd", "a//b", "a\\b", ""] {
            assert!(
                matches!(ns.get(key).await, Err(AssetError::InvalidKey { .. })),
                "key {key:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_verify_content_key() {
        let bytes = b"body { margin: 0 }";
        let key = content_key("style.css", bytes);
        assert!(verify_content_key(&key, bytes).is_ok());
    }

    #[test]
    fn test_verify_detects_corruption() {
        let key = content_key("style.css", b"original");
        assert!(matches!(
            verify_content_key(&key, b"tampered"),
            Err(AssetError::Integrity { .. })
        ));
    }

    #[test]
    fn test_verify_rejects_unaddressed_key() {
        assert!(matches!(
            verify_content_key("style.css", b"x"),
            Err(AssetError::InvalidKey { .. })
        ));
        assert!(matches!(
            verify_content_key("style.nothex!goodbye.css", b"x"),
            Err(AssetError::InvalidKey { .. })
        ));
    }
}
