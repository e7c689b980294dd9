use anyhow::Context;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

use nird_cli::server::{serve, AppState};
use nird_cli::{dataset_path, load_config, load_dataset, logging};

#[derive(Parser)]
#[command(name = "nird-server", version, about = "NIRD semantic search HTTP API")]
struct Cli {
    /// Bind address, overrides server.host
    #[arg(long)]
    host: Option<String>,

    /// Bind port, overrides server.port
    #[arg(short, long)]
    port: Option<u16>,

    /// Dataset file, overrides data.dataset_path
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// Directory holding config.toml (defaults to the working directory)
    #[arg(long)]
    config_dir: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.json_logs);

    let config = load_config(cli.config_dir.as_deref())?;
    let settings = config.settings();
    let host = cli.host.unwrap_or_else(|| settings.server.host.clone());
    let port = cli.port.unwrap_or(settings.server.port);
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("Invalid bind address {host}:{port}"))?;

    tracing::info!("indexing NIRD chunks");
    let dataset = load_dataset(&dataset_path(&config, cli.dataset.as_deref()))?;
    let state = AppState::new(dataset, settings);
    serve(state, addr).await
}
