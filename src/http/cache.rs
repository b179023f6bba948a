//! HTTP cache control module
//!
//! Strong `ETag` generation and conditional request handling.

/// Number of hex characters of the content hash carried in an `ETag`.
const ETAG_HEX_LEN: usize = 16;

/// Generate a strong `ETag` from asset content
///
/// The tag is the quoted leading portion of the blake3 hash of the bytes,
/// which keeps it aligned with the content-addressed storage keys.
///
/// # Examples
/// ```
/// use kvedge::http::cache::strong_etag;
/// let etag = strong_etag(b"hello world");
/// assert!(etag.starts_with('"') && etag.ends_with('"'));
/// assert_eq!(etag.len(), 18);
/// ```
pub fn strong_etag(content: &[u8]) -> String {
    let hash = blake3::hash(content);
    format!("\"{}\"", &hash.to_hex().as_str()[..ETAG_HEX_LEN])
}

/// Check whether the client's `If-None-Match` header matches the `ETag`
///
/// Handles single tags, comma-separated lists, and the `*` wildcard.
/// Returns true when the handler should answer 304 Not Modified.
pub fn if_none_match_hits(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|header| {
        header
            .split(',')
            .any(|candidate| candidate.trim() == etag || candidate.trim() == "*")
    })
}
