mod config_loader;
mod defaults;

pub use config_loader::{ConfigLoader, ConfigOverrides};
pub use defaults::generate_unique_id;

use crate::constants::MIN_REPORT_PERIOD;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Mutable tracker settings. Read and written as a whole under the tracker's state lock.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct TrackerConfig {
    pub unique_id: String,
    pub report_url: Option<Url>,
    pub report_at_shutdown: bool,
    /// Seconds between automatic flushes; zero, negative or non-finite turns the timer off.
    pub report_interval: f64,
    pub be_verbose: bool,
    pub request_timeout_ms: u64,
    pub shutdown_deadline_ms: u64,
}

impl TrackerConfig {
    pub fn report_period(&self) -> Option<Duration> {
        report_period(self.report_interval)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn shutdown_deadline(&self) -> Duration {
        Duration::from_millis(self.shutdown_deadline_ms)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid report URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("report URL {url:?} uses unsupported scheme {scheme:?}")]
    UnsupportedScheme { url: String, scheme: String },
}

pub fn report_period(interval_secs: f64) -> Option<Duration> {
    if interval_secs.is_finite() && interval_secs > 0.0 {
        Duration::try_from_secs_f64(interval_secs)
            .ok()
            .map(|period| period.max(MIN_REPORT_PERIOD))
    } else {
        None
    }
}

/// Accepts absolute `http`/`https` URLs only.
pub fn parse_report_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidUrl {
        url: raw.to_string(),
        source,
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(ConfigError::UnsupportedScheme {
            url: raw.to_string(),
            scheme: scheme.to_string(),
        }),
    }
}
