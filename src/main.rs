use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use subportal::{run_server, util, Config, ServerConfig, WebAppState};

/// Subcontractor partner interest portal
#[derive(Parser)]
#[command(name = "subportal", version)]
struct Args {
    /// Directory holding the config, the submission table and logs
    #[arg(long, env = "SUBPORTAL_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Config file (defaults to <data-dir>/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the bind address from the config file
    #[arg(long)]
    host: Option<String>,

    /// Override the port from the config file
    #[arg(short, long)]
    port: Option<u16>,

    /// Log to stderr instead of the log file
    #[arg(long)]
    log_stderr: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    util::init_data_dir(args.data_dir);

    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());
    if args.log_stderr {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    } else {
        // Log to file (~/.subportal/logs/portal.log)
        fs::create_dir_all(util::logs_dir())?;
        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(util::log_file_path())?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(log_file)
            .with_ansi(false)
            .init();
    }

    let config = match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };

    let mut server_config = ServerConfig::from(&config);
    if let Some(host) = args.host {
        server_config.host = host;
    }
    if let Some(port) = args.port {
        server_config.port = port;
    }

    let state = WebAppState::new(config);
    run_server(state, server_config).await
}
