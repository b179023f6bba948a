//! Asset lookup module
//!
//! Maps logical site paths to bytes: manifest resolution, the key-value
//! namespace behind it, and the deferred-populated hot cache in front of
//! it. [`fetch`] is the single entry point the responder calls.

pub mod hot_cache;
pub mod manifest;
pub mod path;
pub mod store;

use crate::config::AppState;
use crate::http::{cache, mime};
use hyper::body::Bytes;
use std::path::Path;
use std::sync::Arc;
use store::AssetError;

/// What the lookup facility hands back for a served asset
#[derive(Debug)]
pub struct ResolvedAsset {
    pub bytes: Bytes,
    pub content_type: &'static str,
    pub etag: String,
}

/// Fetch the asset for an already-mapped logical path
///
/// Order of consultation: hot cache, then manifest -> namespace. A store
/// hit schedules cache population on the deferred queue rather than
/// inserting inline, so the response is never taxed by it. Exactly one
/// namespace attempt is made; every failure mode comes back as an
/// [`AssetError`] for the caller to collapse into its miss response.
pub async fn fetch(state: &AppState, logical: &str) -> Result<Arc<ResolvedAsset>, AssetError> {
    if let Some(cache) = &state.cache {
        if let Some(asset) = cache.get(logical) {
            return Ok(asset);
        }
    }

    let key = state
        .manifest
        .resolve(logical)
        .ok_or_else(|| AssetError::NotMapped {
            path: logical.to_string(),
        })?;

    let bytes = state.store.get(key).await?;

    if state.config.site.verify_integrity {
        store::verify_content_key(key, &bytes)?;
    }

    let extension = Path::new(logical).extension().and_then(|e| e.to_str());
    let asset = Arc::new(ResolvedAsset {
        etag: cache::strong_etag(&bytes),
        content_type: mime::content_type_for(extension),
        bytes,
    });

    if let Some(hot) = &state.cache {
        let hot = Arc::clone(hot);
        let logical = logical.to_string();
        let populated = Arc::clone(&asset);
        let _ = state.deferred.submit(async move {
            hot.insert(logical, populated);
        });
    }

    Ok(asset)
}
