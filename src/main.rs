mod core_cli;

use crate::core_cli::Cli;
use anyhow::Result;
use clap::Parser;
use env_logger::{Builder, Env};
use std::io::Write;
use std::sync::Arc;
use uftpd::{Config, FtpServer, LogObserver};

const DEFAULT_CONFIG_PATH: &str = "/etc/uftpd.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Cli::parse();

    // Initialize the logger with a custom format
    let default_level = if args.verbose { "debug" } else { "info" };
    Builder::from_env(Env::default().default_filter_or(default_level))
        .format(|buf, record| {
            let timestamp = buf.timestamp();
            writeln!(
                buf,
                "[{}] [{}] {}",
                timestamp,
                record.level(),
                record.args()
            )
        })
        .init();

    // Load configuration from the TOML file; fall back to defaults when no
    // config was given and the default path does not exist.
    let mut config = if args.config.is_empty() {
        if std::path::Path::new(DEFAULT_CONFIG_PATH).exists() {
            Config::load_from_file(DEFAULT_CONFIG_PATH)?
        } else {
            Config::default()
        }
    } else {
        Config::load_from_file(&args.config)?
    };

    // CLI overrides
    if let Some(port) = args.port {
        config.server.listen_port = port;
    }
    if let Some(start_dir) = args.start_dir {
        config.server.start_dir = start_dir;
    }

    log::info!(
        "Starting uftpd on {}:{} serving {}",
        config.server.listen_address,
        config.server.listen_port,
        config.server.start_dir
    );

    let server = FtpServer::bind(config, Arc::new(LogObserver)).await?;
    server.run().await
}
