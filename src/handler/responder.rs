//! Edge asset responder module
//!
//! Single-shot request/response mapping: derive the logical asset path
//! from the URL, make one lookup attempt, and answer either the asset or
//! the uniform miss response. Nothing else about the request is
//! interpreted, and no failure escapes this boundary.

use crate::assets::{self, path::map_request_path};
use crate::config::AppState;
use crate::http::{self, cache};
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

/// Main entry point for HTTP request handling
///
/// Generic over the request body: the responder never reads it, and tests
/// drive it with plain in-memory requests.
pub async fn handle_request<B>(
    req: Request<B>,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();

    let method = req.method().clone();
    let is_head = method == Method::HEAD;
    // Kept verbatim: the miss response quotes this exact string.
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(ToString::to_string);
    let http_version = version_label(req.version()).to_string();
    let if_none_match = header_value(&req, "if-none-match");
    let referer = header_value(&req, "referer");
    let user_agent = header_value(&req, "user-agent");

    let logical = map_request_path(&path, &state.config.site.index_file);

    let response = match assets::fetch(&state, &logical).await {
        Ok(asset) => {
            if cache::if_none_match_hits(if_none_match.as_deref(), &asset.etag) {
                http::build_not_modified(&asset.etag, state.config.http.cache_max_age)
            } else {
                http::build_asset_response(
                    asset.bytes.clone(),
                    asset.content_type,
                    &asset.etag,
                    state.config.http.cache_max_age,
                    &state.config.http.server_name,
                    is_head,
                )
            }
        }
        // One attempt, one uniform outcome: every lookup failure becomes
        // the 404 contract, and the process keeps serving.
        Err(_) => http::build_not_found(&path),
    };

    if state.cached_access_log.load(Ordering::Relaxed) {
        let mut entry = AccessLogEntry::new(peer_addr.to_string(), method.to_string(), path);
        entry.query = query;
        entry.http_version = http_version;
        entry.status = response.status().as_u16();
        entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
        entry.referer = referer;
        entry.user_agent = user_agent;
        entry.duration_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);

        let format = state.config.logging.access_log_format.clone();
        let _ = state
            .deferred
            .submit(async move { logger::log_access(&entry, &format) });
    }

    Ok(response)
}

fn header_value<B>(req: &Request<B>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::manifest::AssetManifest;
    use crate::assets::store::{content_key, MemoryNamespace};
    use crate::config::test_state;
    use crate::deferred::JobRunner;
    use http_body_util::BodyExt;
    use hyper::ext::ReasonPhrase;
    use std::collections::HashMap;

    const INDEX: &[u8] = b"<html>home</html>";
    const INSTALL: &[u8] = b"<html>install guide</html>";
    const LOGO: &[u8] = b"<svg xmlns='http://www.w3.org/2000/svg'/>";

    fn site_state() -> (Arc<AppState>, JobRunner) {
        let mut ns = MemoryNamespace::default();
        let mut entries = HashMap::new();
        for (logical, bytes) in [
            ("index.html", INDEX),
            ("guide/installation.html", INSTALL),
            ("logo.svg", LOGO),
        ] {
            let key = content_key(logical, bytes);
            ns.insert(key.clone(), bytes);
            entries.insert(logical.to_string(), key);
        }

        let (state, runner) = test_state(AssetManifest::from_entries(entries), Arc::new(ns));
        (Arc::new(state), runner)
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:55555".parse().unwrap()
    }

    fn get(uri: &str) -> Request<Full<Bytes>> {
        Request::builder()
            .uri(uri)
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    async fn body_of(resp: Response<Full<Bytes>>) -> Bytes {
        resp.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn test_present_path_serves_stored_bytes() {
        let (state, _runner) = site_state();
        let resp = handle_request(get("/guide/installation.html"), peer(), state)
            .await
            .unwrap();

        assert_eq!(resp.status(), 200);
        assert_eq!(
            resp.headers().get("Content-Type").unwrap(),
            "text/html; charset=utf-8"
        );
        assert!(resp.headers().contains_key("ETag"));
        assert_eq!(
            resp.headers().get("Cache-Control").unwrap(),
            "public, max-age=3600"
        );
        assert_eq!(&body_of(resp).await[..], INSTALL);
    }

    #[tokio::test]
    async fn test_missing_path_matches_404_contract() {
        let (state, _runner) = site_state();
        let resp = handle_request(get("/does-not-exist"), peer(), state)
            .await
            .unwrap();

        assert_eq!(resp.status(), 404);
        assert_eq!(
            resp.extensions()
                .get::<ReasonPhrase>()
                .map(ReasonPhrase::as_bytes),
            Some(&b"not found"[..])
        );
        assert_eq!(&body_of(resp).await[..], b"\"/does-not-exist\" not found");
    }

    #[tokio::test]
    async fn test_root_serves_index_document() {
        let (state, _runner) = site_state();
        let resp = handle_request(get("/"), peer(), state).await.unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(&body_of(resp).await[..], INDEX);
    }

    #[tokio::test]
    async fn test_root_without_index_falls_through_to_404() {
        let (state, _runner) = test_state(
            AssetManifest::default(),
            Arc::new(MemoryNamespace::default()),
        );
        let resp = handle_request(get("/"), peer(), Arc::new(state))
            .await
            .unwrap();
        assert_eq!(resp.status(), 404);
        assert_eq!(&body_of(resp).await[..], b"\"/\" not found");
    }

    #[tokio::test]
    async fn test_repeated_request_is_idempotent() {
        let (state, _runner) = site_state();

        let first = handle_request(get("/logo.svg"), peer(), Arc::clone(&state))
            .await
            .unwrap();
        let second = handle_request(get("/logo.svg"), peer(), state)
            .await
            .unwrap();

        assert_eq!(first.status(), second.status());
        assert_eq!(body_of(first).await, body_of(second).await);
    }

    #[tokio::test]
    async fn test_if_none_match_shortcuts_to_304() {
        let (state, _runner) = site_state();
        let etag = cache::strong_etag(INDEX);

        let req = Request::builder()
            .uri("/index.html")
            .header("if-none-match", &etag)
            .body(Full::new(Bytes::new()))
            .unwrap();
        let resp = handle_request(req, peer(), state).await.unwrap();

        assert_eq!(resp.status(), 304);
        assert_eq!(resp.headers().get("ETag").unwrap(), etag.as_str());
        assert!(body_of(resp).await.is_empty());
    }

    #[tokio::test]
    async fn test_head_keeps_headers_drops_body() {
        let (state, _runner) = site_state();
        let req = Request::builder()
            .method(Method::HEAD)
            .uri("/logo.svg")
            .body(Full::new(Bytes::new()))
            .unwrap();
        let resp = handle_request(req, peer(), state).await.unwrap();

        assert_eq!(resp.status(), 200);
        assert_eq!(
            resp.headers().get("Content-Length").unwrap(),
            &LOGO.len().to_string()
        );
        assert!(body_of(resp).await.is_empty());
    }

    #[tokio::test]
    async fn test_method_does_not_affect_routing() {
        let (state, _runner) = site_state();
        let req = Request::builder()
            .method(Method::POST)
            .uri("/logo.svg")
            .body(Full::new(Bytes::new()))
            .unwrap();
        let resp = handle_request(req, peer(), state).await.unwrap();

        assert_eq!(resp.status(), 200);
        assert_eq!(&body_of(resp).await[..], LOGO);
    }

    #[tokio::test]
    async fn test_corrupted_store_object_is_a_miss() {
        let mut ns = MemoryNamespace::default();
        let key = content_key("index.html", b"published");
        ns.insert(key.clone(), b"tampered".as_slice());
        let manifest =
            AssetManifest::from_entries(HashMap::from([("index.html".to_string(), key)]));

        let (state, _runner) = test_state(manifest, Arc::new(ns));
        let resp = handle_request(get("/index.html"), peer(), Arc::new(state))
            .await
            .unwrap();

        assert_eq!(resp.status(), 404);
        assert_eq!(&body_of(resp).await[..], b"\"/index.html\" not found");
    }
}
