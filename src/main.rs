use std::path::Path;
use std::sync::Arc;

use kvedge::assets::manifest::AssetManifest;
use kvedge::assets::store::{AssetNamespace, FsNamespace};
use kvedge::config::{AppState, Config};
use kvedge::{logger, server};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load()?;
    logger::init(&cfg)?;

    // The manifest is loaded exactly once; requests only ever read it.
    let manifest = AssetManifest::load(Path::new(&cfg.site.manifest))?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg, manifest))
}

async fn async_main(
    cfg: Config,
    manifest: AssetManifest,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_reusable_listener(addr)?;

    let store: Arc<dyn AssetNamespace> = Arc::new(FsNamespace::new(&cfg.site.store_root));
    let (state, jobs) = AppState::new(cfg, manifest, store);
    let state = Arc::new(state);

    logger::log_server_start(&addr, &state.config, state.manifest.len());

    // Connection tasks and the deferred-job runner use spawn_local
    let local = tokio::task::LocalSet::new();
    local.run_until(server::run(listener, state, jobs)).await
}
