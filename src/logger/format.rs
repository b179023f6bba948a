//! Access log format module
//!
//! One record per served request, rendered as Apache combined, Common Log
//! Format, JSON, or a custom `$variable` pattern.

use chrono::Local;

/// Access log entry for a single request/response pair
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    pub remote_addr: String,
    pub time: chrono::DateTime<Local>,
    pub method: String,
    /// Request URL path, verbatim
    pub path: String,
    pub query: Option<String>,
    pub http_version: String,
    pub status: u16,
    pub body_bytes: u64,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    /// Handler time in microseconds
    pub duration_us: u64,
}

impl AccessLogEntry {
    /// New entry stamped with the current local time.
    pub fn new(remote_addr: String, method: String, path: String) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            method,
            path,
            query: None,
            http_version: "1.1".to_string(),
            status: 200,
            body_bytes: 0,
            referer: None,
            user_agent: None,
            duration_us: 0,
        }
    }

    /// Render the entry in the configured format.
    pub fn format(&self, format: &str) -> String {
        match format {
            "combined" => self.format_combined(),
            "common" => self.format_common(),
            "json" => self.format_json(),
            custom => self.format_custom(custom),
        }
    }

    fn request_line(&self) -> String {
        let query = self
            .query
            .as_ref()
            .map(|q| format!("?{q}"))
            .unwrap_or_default();
        format!(
            "{} {}{} HTTP/{}",
            self.method, self.path, query, self.http_version
        )
    }

    fn timestamp(&self) -> String {
        self.time.format("%d/%b/%Y:%H:%M:%S %z").to_string()
    }

    /// Apache/Nginx combined format:
    /// `$remote_addr - - [$time] "$request" $status $bytes "$referer" "$user_agent"`
    fn format_combined(&self) -> String {
        format!(
            "{} - - [{}] \"{}\" {} {} \"{}\" \"{}\"",
            self.remote_addr,
            self.timestamp(),
            self.request_line(),
            self.status,
            self.body_bytes,
            self.referer.as_deref().unwrap_or("-"),
            self.user_agent.as_deref().unwrap_or("-"),
        )
    }

    /// Common Log Format (CLF)
    fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{}\" {} {}",
            self.remote_addr,
            self.timestamp(),
            self.request_line(),
            self.status,
            self.body_bytes,
        )
    }

    /// One JSON object per line
    fn format_json(&self) -> String {
        serde_json::json!({
            "remote_addr": self.remote_addr,
            "time": self.time.to_rfc3339(),
            "method": self.method,
            "path": self.path,
            "query": self.query,
            "http_version": self.http_version,
            "status": self.status,
            "body_bytes": self.body_bytes,
            "referer": self.referer,
            "user_agent": self.user_agent,
            "duration_us": self.duration_us,
        })
        .to_string()
    }

    /// Custom pattern with `$variable` substitution
    fn format_custom(&self, pattern: &str) -> String {
        pattern
            .replace("$remote_addr", &self.remote_addr)
            .replace("$time_local", &self.timestamp())
            .replace("$request", &self.request_line())
            .replace("$method", &self.method)
            .replace("$path", &self.path)
            .replace("$status", &self.status.to_string())
            .replace("$body_bytes", &self.body_bytes.to_string())
            .replace("$duration_us", &self.duration_us.to_string())
            .replace("$user_agent", self.user_agent.as_deref().unwrap_or("-"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> AccessLogEntry {
        let mut entry = AccessLogEntry::new(
            "203.0.113.7:40312".to_string(),
            "GET".to_string(),
            "/guide/installation.html".to_string(),
        );
        entry.status = 200;
        entry.body_bytes = 1234;
        entry.user_agent = Some("curl/8.0".to_string());
        entry
    }

    #[test]
    fn test_combined_format() {
        let line = entry().format("combined");
        assert!(line.starts_with("203.0.113.7:40312 - - ["));
        assert!(line.contains("\"GET /guide/installation.html HTTP/1.1\" 200 1234"));
        assert!(line.ends_with("\"-\" \"curl/8.0\""));
    }

    #[test]
    fn test_common_format_has_no_agent() {
        let line = entry().format("common");
        assert!(line.ends_with("200 1234"));
        assert!(!line.contains("curl"));
    }

    #[test]
    fn test_json_format_parses() {
        let line = entry().format("json");
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["status"], 200);
        assert_eq!(value["path"], "/guide/installation.html");
    }

    #[test]
    fn test_custom_pattern() {
        let line = entry().format("$method $path -> $status");
        assert_eq!(line, "GET /guide/installation.html -> 200");
    }
}
