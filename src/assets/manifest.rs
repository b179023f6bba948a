//! Asset manifest module
//!
//! The manifest maps logical site paths (`guide/installation.html`) to the
//! content-addressed storage keys under which the deploy step placed the
//! bytes. It is produced at build time, loaded once at process start, and
//! read-only from then on.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors loading the manifest at startup
///
/// A manifest that cannot be read or parsed is a boot failure; a manifest
/// entry that turns out to be wrong at request time surfaces later as an
/// ordinary lookup miss.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read asset manifest '{path}'")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("asset manifest '{path}' is not a JSON object of path -> key")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Immutable logical-path -> storage-key mapping
#[derive(Debug, Clone, Default)]
pub struct AssetManifest {
    entries: HashMap<String, String>,
}

impl AssetManifest {
    /// Load and parse the manifest JSON file.
    ///
    /// Logical paths are normalized to have no leading slash, so lookups
    /// after [`map_request_path`](crate::assets::path::map_request_path)
    /// hit regardless of which convention the deploy tool wrote.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ManifestError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        let parsed: HashMap<String, String> =
            serde_json::from_str(&raw).map_err(|e| ManifestError::Parse {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(Self::from_entries(parsed))
    }

    /// Build a manifest from already-parsed entries.
    pub fn from_entries(entries: HashMap<String, String>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(path, key)| (path.trim_start_matches('/').to_string(), key))
            .collect();
        Self { entries }
    }

    /// Resolve a logical path to its storage key.
    pub fn resolve(&self, logical: &str) -> Option<&str> {
        self.entries.get(logical).map(String::as_str)
    }

    /// Number of published assets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
