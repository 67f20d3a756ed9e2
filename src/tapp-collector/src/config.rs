use anyhow::{Context, Result};
use config::{Config as RConfig, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_LISTEN: &str = "127.0.0.1:8722";
pub const DEFAULT_LOG_DIR: &str = "data_logs";
pub const DEFAULT_FILE_PREFIX: &str = "tapp_events_";
pub const ENV_PREFIX: &str = "TAPP_COLLECTOR";

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct CollectorConfig {
    pub listen: String,
    /// Directory receiving one log file per UTC day
    pub log_dir: PathBuf,
    pub file_prefix: String,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            listen: DEFAULT_LISTEN.to_string(),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub listen: Option<String>,
    pub log_dir: Option<PathBuf>,
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load(path: Option<&Path>, overrides: ConfigOverrides) -> Result<CollectorConfig> {
        let mut builder = RConfig::builder()
            .set_default("listen", DEFAULT_LISTEN)?
            .set_default("log_dir", DEFAULT_LOG_DIR)?
            .set_default("file_prefix", DEFAULT_FILE_PREFIX)?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(Environment::with_prefix(ENV_PREFIX));

        if let Some(listen) = overrides.listen {
            builder = builder.set_override("listen", listen)?;
        }
        if let Some(log_dir) = overrides.log_dir {
            builder = builder.set_override("log_dir", log_dir.to_string_lossy().into_owned())?;
        }

        builder
            .build()?
            .try_deserialize()
            .context("failed to parse collector config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_overrides() {
        let config = ConfigLoader::load(None, ConfigOverrides::default()).unwrap();
        assert_eq!(config, CollectorConfig::default());

        let overrides = ConfigOverrides {
            listen: Some("0.0.0.0:9000".to_string()),
            log_dir: Some(PathBuf::from("/var/log/tapp")),
        };
        let config = ConfigLoader::load(None, overrides).unwrap();
        assert_eq!(config.listen, "0.0.0.0:9000");
        assert_eq!(config.log_dir, PathBuf::from("/var/log/tapp"));
        assert_eq!(config.file_prefix, DEFAULT_FILE_PREFIX);
    }
}
