use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Client settings from `finrecon.yaml`, overridable by `FINRECON_*` environment variables.
///
/// Every field has a default so a missing or partial file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// Base URL of the comparison service API, e.g. `http://127.0.0.1:8000/api`
    pub backend_url: String,

    /// Per-request timeout. Unset means the HTTP client's default (no timeout).
    pub request_timeout_secs: Option<u64>,

    /// Directory for rotating log files
    pub log_dir: String,

    pub debug_mode: bool,

    /// Number of result rows the CLI prints
    pub preview_rows: usize,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:8000/api".to_string(),
            request_timeout_secs: None,
            log_dir: "logs".to_string(),
            debug_mode: false,
            preview_rows: 25,
        }
    }
}

impl ClientSettings {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
