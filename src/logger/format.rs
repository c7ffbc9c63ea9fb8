//! Access log format module
//!
//! Supported formats:
//! - `common` (Common Log Format, with the authenticated user in the ident slot)
//! - `json` (one JSON object per request)
//! - `compact` (method, path, status and timing only)

use chrono::{DateTime, Local};
use serde::Serialize;

/// One served API request
#[derive(Debug, Clone, Serialize)]
pub struct AccessLogEntry {
    /// Client IP address
    pub remote_addr: String,
    pub time: DateTime<Local>,
    pub method: String,
    pub path: String,
    pub status: u16,
    /// Response body size in bytes
    pub body_bytes: usize,
    /// Authenticated user, when the route required one and it resolved
    pub user: Option<String>,
    /// Request processing time in microseconds
    pub request_time_us: u64,
}

impl AccessLogEntry {
    /// Create a new entry stamped with the current time
    pub fn new(remote_addr: String, method: String, path: String) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            method,
            path,
            status: 200,
            body_bytes: 0,
            user: None,
            request_time_us: 0,
        }
    }

    /// Format the entry; unknown format names fall back to `common`
    pub fn format(&self, format: &str) -> String {
        match format {
            "json" => self.format_json(),
            "compact" => self.format_compact(),
            _ => self.format_common(),
        }
    }

    /// `$remote_addr $user - [$time_local] "$method $path" $status $body_bytes`
    fn format_common(&self) -> String {
        format!(
            "{} {} - [{}] \"{} {}\" {} {}",
            self.remote_addr,
            self.user.as_deref().unwrap_or("-"),
            self.time.format("%d/%b/%Y:%H:%M:%S %z"),
            self.method,
            self.path,
            self.status,
            self.body_bytes,
        )
    }

    fn format_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| format!("{{\"error\":\"{e}\"}}"))
    }

    fn format_compact(&self) -> String {
        #[allow(clippy::cast_precision_loss)]
        let millis = self.request_time_us as f64 / 1000.0;
        format!(
            "{} {} {} {millis:.1}ms",
            self.method, self.path, self.status
        )
    }
}
