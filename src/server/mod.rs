//! Server module
//!
//! Accept loop and per-connection serving. Connections and deferred jobs
//! share one `LocalSet`; a stop signal breaks the accept loop and lets
//! in-flight connections finish naturally.

pub mod connection;
pub mod listener;

pub use listener::create_reusable_listener;

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::AppState;
use crate::deferred::JobRunner;
use crate::logger;

/// Run the accept loop until a stop signal arrives.
///
/// Must be called inside a `tokio::task::LocalSet`: both the deferred-job
/// runner and each connection task are spawned locally.
pub async fn run(
    listener: TcpListener,
    state: Arc<AppState>,
    jobs: JobRunner,
) -> Result<(), Box<dyn std::error::Error>> {
    tokio::task::spawn_local(jobs.run());

    let active_connections = Arc::new(AtomicUsize::new(0));

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        connection::accept_connection(
                            stream,
                            peer_addr,
                            &state,
                            &active_connections,
                        );
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            _ = tokio::signal::ctrl_c() => {
                logger::log_shutdown();
                break;
            }
        }
    }

    Ok(())
}
