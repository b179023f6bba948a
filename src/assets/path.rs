//! Request path mapping module
//!
//! Derives the logical manifest path from an incoming URL path. The URL
//! path itself is kept verbatim elsewhere (the miss response quotes it
//! exactly as received); only the lookup uses the mapped form.

/// Map a request's URL path to the logical asset path
///
/// Follows the site convention the deploy tool writes the manifest with:
/// - `/` and any path ending in `/` serve that directory's index document
/// - an extensionless final segment serves `<segment>/<index document>`
/// - everything else is looked up verbatim, minus the leading slash
///
/// # Examples
/// ```
/// use kvedge::assets::path::map_request_path;
/// assert_eq!(map_request_path("/", "index.html"), "index.html");
/// assert_eq!(map_request_path("/guide/", "index.html"), "guide/index.html");
/// assert_eq!(map_request_path("/guide", "index.html"), "guide/index.html");
/// assert_eq!(map_request_path("/logo.svg", "index.html"), "logo.svg");
/// ```
pub fn map_request_path(path: &str, index_file: &str) -> String {
    let logical = path.trim_start_matches('/');

    if logical.is_empty() {
        return index_file.to_string();
    }
    if logical.ends_with('/') {
        return format!("{logical}{index_file}");
    }

    let last_segment = logical.rsplit('/').next().unwrap_or(logical);
    if last_segment.contains('.') {
        logical.to_string()
    } else {
        format!("{logical}/{index_file}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_maps_to_index() {
        assert_eq!(map_request_path("/", "index.html"), "index.html");
        assert_eq!(map_request_path("", "index.html"), "index.html");
    }

    #[test]
    fn test_trailing_slash_appends_index() {
        assert_eq!(
            map_request_path("/guide/", "index.html"),
            "guide/index.html"
        );
    }

    #[test]
    fn test_extensionless_gets_directory_index() {
        assert_eq!(map_request_path("/guide", "index.html"), "guide/index.html");
        assert_eq!(
            map_request_path("/guide/install", "index.html"),
            "guide/install/index.html"
        );
    }

    #[test]
    fn test_file_paths_pass_through() {
        assert_eq!(
            map_request_path("/guide/installation.html", "index.html"),
            "guide/installation.html"
        );
        assert_eq!(map_request_path("/favicon.ico", "index.html"), "favicon.ico");
    }

    #[test]
    fn test_configured_index_document() {
        assert_eq!(map_request_path("/", "home.html"), "home.html");
    }
}
