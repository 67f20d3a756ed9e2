use tapp_tracker::cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cli::process_command().await
}
