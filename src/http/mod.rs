//! HTTP protocol layer module
//!
//! Protocol-level helpers shared by the asset responder: MIME detection,
//! cache validation, and response builders. Nothing in here knows about
//! the manifest or the store.

pub mod cache;
pub mod mime;
pub mod response;

// Re-export commonly used builders
pub use response::{build_asset_response, build_not_found, build_not_modified};
