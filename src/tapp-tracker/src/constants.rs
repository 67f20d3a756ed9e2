use std::time::Duration;

pub const DEFAULT_REPORT_INTERVAL_SECS: f64 = 30.0;
pub const DEFAULT_REPORT_AT_SHUTDOWN: bool = true;
pub const DEFAULT_BE_VERBOSE: bool = false;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_SHUTDOWN_DEADLINE_MS: u64 = 5_000;
/// Shortest timer period; smaller positive intervals are rounded up to it.
pub const MIN_REPORT_PERIOD: Duration = Duration::from_millis(1);

pub const ENV_PREFIX: &str = "TAPP";
pub const USER_AGENT: &str = concat!("tapp-tracker/", env!("CARGO_PKG_VERSION"));
