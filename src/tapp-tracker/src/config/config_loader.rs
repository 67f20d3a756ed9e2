use anyhow::{Context, Result};
use config::{Config as RConfig, Environment, File};
use serde::Deserialize;
use std::path::Path;
use tracing::warn;

use crate::config::{generate_unique_id, parse_report_url, TrackerConfig};
use crate::constants::{
    DEFAULT_BE_VERBOSE, DEFAULT_REPORT_AT_SHUTDOWN, DEFAULT_REPORT_INTERVAL_SECS,
    DEFAULT_REQUEST_TIMEOUT_MS, DEFAULT_SHUTDOWN_DEADLINE_MS, ENV_PREFIX,
};

/// Values given on the command line; they win over the file and the environment.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub unique_id: Option<String>,
    pub report_url: Option<String>,
    pub report_interval: Option<f64>,
    pub be_verbose: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RawTrackerConfig {
    #[serde(default)]
    unique_id: String,
    #[serde(default)]
    report_url: Option<String>,
    report_at_shutdown: bool,
    report_interval: f64,
    be_verbose: bool,
    request_timeout_ms: u64,
    shutdown_deadline_ms: u64,
}

impl RawTrackerConfig {
    fn into_config(self) -> TrackerConfig {
        let unique_id = match self.unique_id.trim() {
            "" => generate_unique_id(),
            id => id.to_string(),
        };

        let report_url = self
            .report_url
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .and_then(|raw| match parse_report_url(raw) {
                Ok(url) => Some(url),
                Err(e) => {
                    warn!("{}; event delivery is disabled", e);
                    None
                }
            });

        TrackerConfig {
            unique_id,
            report_url,
            report_at_shutdown: self.report_at_shutdown,
            report_interval: self.report_interval,
            be_verbose: self.be_verbose,
            request_timeout_ms: self.request_timeout_ms,
            shutdown_deadline_ms: self.shutdown_deadline_ms,
        }
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Layers built-in defaults, the optional TOML file, `TAPP_*` environment variables and
    /// finally `overrides`.
    pub fn load(path: Option<&Path>, overrides: ConfigOverrides) -> Result<TrackerConfig> {
        let mut builder = RConfig::builder();

        // set defaults
        builder = builder
            .set_default("unique_id", "")?
            .set_default("report_at_shutdown", DEFAULT_REPORT_AT_SHUTDOWN)?
            .set_default("report_interval", DEFAULT_REPORT_INTERVAL_SECS)?
            .set_default("be_verbose", DEFAULT_BE_VERBOSE)?
            .set_default("request_timeout_ms", DEFAULT_REQUEST_TIMEOUT_MS)?
            .set_default("shutdown_deadline_ms", DEFAULT_SHUTDOWN_DEADLINE_MS)?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true));

        // set overrides
        if let Some(unique_id) = overrides.unique_id {
            builder = builder.set_override("unique_id", unique_id)?;
        }
        if let Some(report_url) = overrides.report_url {
            builder = builder.set_override("report_url", report_url)?;
        }
        if let Some(report_interval) = overrides.report_interval {
            builder = builder.set_override("report_interval", report_interval)?;
        }
        if let Some(be_verbose) = overrides.be_verbose {
            builder = builder.set_override("be_verbose", be_verbose)?;
        }

        let raw: RawTrackerConfig = builder
            .build()?
            .try_deserialize()
            .context("failed to parse tracker config")?;

        Ok(raw.into_config())
    }

    pub fn load_default_config() -> Result<TrackerConfig> {
        Self::load(None, ConfigOverrides::default())
    }
}
