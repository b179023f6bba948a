// Configuration module entry point
// Layered server configuration plus the shared application state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
#[cfg(test)]
pub use state::test_state;
pub use types::{
    CacheConfig, Config, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig, SiteConfig,
};

impl Config {
    /// Load configuration from the default "config.toml"
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from specified file path (without extension)
    ///
    /// Sources are layered: code defaults, then the optional file, then
    /// `KVEDGE_`-prefixed environment variables. One config object is the
    /// single source of truth; per-environment divergence is expressed as
    /// overrides, never a second copy of the file.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("KVEDGE"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("site.manifest", "site/manifest.json")?
            .set_default("site.store_root", "site/content")?
            .set_default("site.index_file", "index.html")?
            .set_default("site.verify_integrity", true)?
            .set_default("cache.enabled", true)?
            .set_default("cache.max_entries", 256)?
            .set_default("http.server_name", "kvedge/0.2")?
            .set_default("http.cache_max_age", 3600)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let cfg = Config::load_from("/nonexistent/kvedge-config").unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.site.index_file, "index.html");
        assert!(cfg.site.verify_integrity);
        assert!(cfg.cache.enabled);
        assert_eq!(cfg.cache.max_entries, 256);
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert!(cfg.performance.max_connections.is_none());
    }

    #[test]
    fn test_socket_addr() {
        let cfg = Config::load_from("/nonexistent/kvedge-config").unwrap();
        let addr = cfg.get_socket_addr().unwrap();
        assert_eq!(addr.port(), 8080);
        assert!(addr.is_ipv4());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            b"[server]\nport = 9090\n\n[site]\nindex_file = \"home.html\"\n",
        )
        .unwrap();

        let stem = path.with_extension("");
        let cfg = Config::load_from(stem.to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.site.index_file, "home.html");
        // Untouched sections keep their defaults.
        assert_eq!(cfg.server.host, "127.0.0.1");
    }
}
