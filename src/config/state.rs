// Application state module
// Everything a request needs, loaded once at startup and shared behind Arc

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use super::types::Config;
use crate::assets::hot_cache::HotCache;
use crate::assets::manifest::AssetManifest;
use crate::assets::store::AssetNamespace;
use crate::deferred::{DeferredQueue, JobRunner};

/// Shared application state
///
/// The manifest and namespace are read-only for the process lifetime, so
/// concurrent requests share them without locking. The state is handed to
/// the responder explicitly rather than living in a module global, which
/// is what lets tests run the responder against an in-memory site.
pub struct AppState {
    pub config: Config,
    pub manifest: AssetManifest,
    pub store: Arc<dyn AssetNamespace>,
    pub cache: Option<Arc<HotCache>>,
    pub deferred: DeferredQueue,

    // Cached config value for lock-free access on the request path
    pub cached_access_log: AtomicBool,
}

impl AppState {
    /// Build the state and the deferred-job runner that goes with it.
    ///
    /// The runner is returned separately so the server can spawn it on
    /// its own task set; the state only keeps the submission handle.
    pub fn new(
        config: Config,
        manifest: AssetManifest,
        store: Arc<dyn AssetNamespace>,
    ) -> (Self, JobRunner) {
        let (deferred, runner) = DeferredQueue::new();
        let cache = config
            .cache
            .enabled
            .then(|| Arc::new(HotCache::new(config.cache.max_entries)));
        let cached_access_log = AtomicBool::new(config.logging.access_log);

        (
            Self {
                config,
                manifest,
                store,
                cache,
                deferred,
                cached_access_log,
            },
            runner,
        )
    }
}

/// State over an injected site, default config. Test use only.
#[cfg(test)]
pub fn test_state(
    manifest: AssetManifest,
    store: Arc<dyn AssetNamespace>,
) -> (AppState, JobRunner) {
    let config = Config::load_from("/nonexistent/kvedge-config").expect("default config");
    AppState::new(config, manifest, store)
}
