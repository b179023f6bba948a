//! kvedge — self-hosted edge server for static sites
//!
//! Serves a documentation site out of a content-addressed key-value store:
//! a deploy-time manifest maps logical paths to storage keys, the server
//! makes exactly one lookup per request, and every lookup failure collapses
//! into one uniform 404 (`"<path>" not found`). Post-response work (access
//! logging, hot-cache population) runs on a deferred-job queue so the
//! response path never waits for it.

pub mod assets;
pub mod config;
pub mod deferred;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
