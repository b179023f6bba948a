//! HTTP response building module
//!
//! Builders for the responses the asset responder can produce, decoupled
//! from the lookup logic itself.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::ext::ReasonPhrase;
use hyper::Response;

/// Reason phrase carried by every miss response.
const NOT_FOUND_REASON: &[u8] = b"not found";

/// Build a 200 response carrying an asset's bytes
///
/// Headers come from the lookup facility: content type inferred from the
/// asset's extension, a strong `ETag`, and the configured cache lifetime.
/// HEAD requests get identical headers with an empty body.
pub fn build_asset_response(
    data: Bytes,
    content_type: &str,
    etag: &str,
    cache_max_age: u32,
    server_name: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    Response::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .header("ETag", etag)
        .header("Cache-Control", format!("public, max-age={cache_max_age}"))
        .header("Server", server_name)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 304 Not Modified response
pub fn build_not_modified(etag: &str, cache_max_age: u32) -> Response<Full<Bytes>> {
    Response::builder()
        .status(304)
        .header("ETag", etag)
        .header("Cache-Control", format!("public, max-age={cache_max_age}"))
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build the uniform miss response
///
/// Every lookup failure maps to this one shape: status 404, reason phrase
/// `not found`, and a plain-text body quoting the request path verbatim,
/// e.g. `"/missing.html" not found`.
pub fn build_not_found(path: &str) -> Response<Full<Bytes>> {
    let body = format!("\"{path}\" not found");

    Response::builder()
        .status(404)
        .extension(ReasonPhrase::from_static(NOT_FOUND_REASON))
        .header("Content-Type", "text/plain; charset=utf-8")
        .header("Content-Length", body.len())
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
