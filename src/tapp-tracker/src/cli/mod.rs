mod handlers;

use crate::config::{ConfigLoader, ConfigOverrides, TrackerConfig};
use crate::transport::HttpTransport;
use crate::EventTracker;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tapp_common::logging::setup_logging;

#[derive(Parser, Debug, Clone)]
#[clap(
    name = "tapp",
    about = "Record named events and report them to a Tapp collector",
    version
)]
pub struct Cli {
    /// TOML file with tracker settings
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,

    /// Report URL, overrides the file and TAPP_REPORT_URL
    #[clap(long, global = true)]
    pub url: Option<String>,

    /// Install identifier attached to every batch
    #[clap(long, global = true)]
    pub unique_id: Option<String>,

    /// Log every recorded event and flush attempt
    #[clap(long, short, global = true)]
    pub verbose: bool,

    /// Also write logs to this file
    #[clap(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Record one event and report it right away
    Track {
        name: String,
        value: Option<String>,
    },

    /// Read `name[,value]` lines from stdin, reporting periodically and once more at the end
    Pipe {
        /// Seconds between reports, overrides the configured interval
        #[clap(long)]
        interval: Option<f64>,
    },

    /// Show the resolved configuration
    Info {
        /// Output information in JSON format
        #[clap(long)]
        json: bool,
    },
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        let report_interval = match self.command {
            Command::Pipe { interval } => interval,
            _ => None,
        };

        ConfigOverrides {
            unique_id: self.unique_id.clone(),
            report_url: self.url.clone(),
            report_interval,
            be_verbose: self.verbose.then_some(true),
        }
    }
}

fn build_tracker(config: TrackerConfig) -> Result<EventTracker> {
    let transport = HttpTransport::try_new(config.request_timeout())?;
    Ok(EventTracker::new(config, transport))
}

pub async fn process_command() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.log_file.as_deref())?;

    let config = ConfigLoader::load(cli.config.as_deref(), cli.overrides())?;

    match cli.command {
        Command::Info { json } => handlers::info(&config, json),
        Command::Track { name, value } => {
            handlers::track(build_tracker(config)?, name, value).await
        }
        Command::Pipe { .. } => handlers::pipe(build_tracker(config)?).await,
    }
}
