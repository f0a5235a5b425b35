//! Access log formatting.
//!
//! One line per completed request in Common Log Format (CLF):
//! `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`

use chrono::Local;

/// A completed request/response pair, ready to be logged.
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    /// Client IP address
    pub remote_addr: String,
    /// Request timestamp
    pub time: chrono::DateTime<Local>,
    /// HTTP method (GET, HEAD, ...)
    pub method: String,
    /// Request URI path
    pub path: String,
    /// Response status code
    pub status: u16,
    /// Response body size in bytes
    pub body_bytes: usize,
}

impl AccessLogEntry {
    /// Create a new entry stamped with the current local time.
    pub fn new(remote_addr: String, method: String, path: String) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            method,
            path,
            status: 200,
            body_bytes: 0,
        }
    }

    /// Render the entry in Common Log Format.
    pub fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{} {} HTTP/1.1\" {} {}",
            self.remote_addr,
            self.time.format("%d/%b/%Y:%H:%M:%S %z"),
            self.method,
            self.path,
            self.status,
            self.body_bytes,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry() -> AccessLogEntry {
        let mut entry = AccessLogEntry::new(
            "127.0.0.1".to_string(),
            "GET".to_string(),
            "/photos/cat.jpg".to_string(),
        );
        entry.status = 200;
        entry.body_bytes = 2048;
        entry
    }

    #[test]
    fn test_common_format_fields() {
        let line = sample_entry().format_common();
        assert!(line.starts_with("127.0.0.1 - - ["));
        assert!(line.contains("\"GET /photos/cat.jpg HTTP/1.1\""));
        assert!(line.ends_with("200 2048"));
    }

    #[test]
    fn test_status_is_reflected() {
        let mut entry = sample_entry();
        entry.status = 404;
        entry.body_bytes = 13;
        assert!(entry.format_common().ends_with("404 13"));
    }
}
