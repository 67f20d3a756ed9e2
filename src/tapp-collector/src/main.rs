use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tapp_collector::config::{ConfigLoader, ConfigOverrides};
use tapp_collector::CollectorServer;
use tapp_common::logging::setup_logging;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[clap(
    name = "tapp-collector",
    about = "Receive tracker reports and append them to daily event logs",
    version
)]
struct Args {
    /// TOML file with collector settings
    #[clap(long)]
    config: Option<PathBuf>,

    /// Address to listen on, e.g. 0.0.0.0:8722
    #[clap(long)]
    listen: Option<String>,

    /// Directory for the daily log files
    #[clap(long)]
    log_dir: Option<PathBuf>,

    #[clap(long, short)]
    verbose: bool,

    /// Also write diagnostics to this file
    #[clap(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose, args.log_file.as_deref())?;

    let overrides = ConfigOverrides {
        listen: args.listen,
        log_dir: args.log_dir,
    };
    let config = ConfigLoader::load(args.config.as_deref(), overrides)?;
    info!("Writing event logs to {}", config.log_dir.display());

    let server = CollectorServer::bind(&config).await?;
    let shutdown = CancellationToken::new();

    let on_signal = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutting down collector");
                on_signal.cancel();
            }
            Err(e) => warn!("Failed to listen for Ctrl-C, shutdown needs a kill: {}", e),
        }
    });

    server.run(shutdown).await
}
