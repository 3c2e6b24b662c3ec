use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use arkiv_daemon::service_config::{Config, FileConfig, Overrides};
use arkiv_daemon::spawn_service;

#[derive(Debug, Parser)]
#[command(name = "arkiv", about = "Document archive service", version)]
struct Args {
    /// Path to a toml configuration file
    #[arg(long)]
    config: PathBuf,

    /// Override the listen address from the config file
    #[arg(long)]
    listen: Option<SocketAddr>,

    /// Override the sqlite database path from the config file
    #[arg(long)]
    db: Option<PathBuf>,

    /// Override the log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let file = match FileConfig::load(&args.config) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Error: failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    let overrides = Overrides {
        listen_addr: args.listen,
        sqlite_path: args.db,
        log_level: args.log_level,
    };

    let config = match Config::build(file, overrides) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    spawn_service(&config).await;
}
