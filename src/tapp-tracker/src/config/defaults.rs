use crate::config::TrackerConfig;
use crate::constants::{
    DEFAULT_BE_VERBOSE, DEFAULT_REPORT_AT_SHUTDOWN, DEFAULT_REPORT_INTERVAL_SECS,
    DEFAULT_REQUEST_TIMEOUT_MS, DEFAULT_SHUTDOWN_DEADLINE_MS,
};
use uuid::Uuid;

/// Fallback install id, used when none is configured. Not persisted across restarts.
pub fn generate_unique_id() -> String {
    Uuid::new_v4().to_string()
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            unique_id: generate_unique_id(),
            report_url: None,
            report_at_shutdown: DEFAULT_REPORT_AT_SHUTDOWN,
            report_interval: DEFAULT_REPORT_INTERVAL_SECS,
            be_verbose: DEFAULT_BE_VERBOSE,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            shutdown_deadline_ms: DEFAULT_SHUTDOWN_DEADLINE_MS,
        }
    }
}
