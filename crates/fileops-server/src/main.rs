//! Entry point for the fileops stdio server.

use anyhow::Context;
use clap::Parser;
use fileops_config::{FileOpsConfig, LayeredConfigOptions, LogLevel};
use fileops_server::{McpServer, init_logging};
use log::{debug, info};
use std::path::PathBuf;

/// Command-line options for the server.
#[derive(Parser)]
#[command(name = "fileops-server", version)]
struct Cli {
    /// Optional path to a fileops.json5 config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Log level override (DEBUG, INFO, WARN, ERROR)
    #[arg(long, value_parser = parse_level)]
    log_level: Option<LogLevel>,
}

fn parse_level(value: &str) -> Result<LogLevel, String> {
    LogLevel::parse(value)
        .ok_or_else(|| format!("expected one of {}", LogLevel::NAMES.join(", ")))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut options = LayeredConfigOptions::new();
    if let Some(path) = cli.config.as_ref() {
        options = options.with_config_path(path);
    }
    let layered = FileOpsConfig::load_layered(options).context("failed to load config")?;
    init_logging(&layered.config.logging, cli.log_level);
    debug!("layered config loaded (layers={})", layered.layers.len());
    info!(
        "starting server (config_set={}, allowed_paths={}, max_file_size={})",
        cli.config.is_some(),
        layered.config.filesystem.allowed_paths.len(),
        layered.config.filesystem.max_file_size
    );

    let server = McpServer::from_config(&layered.config)
        .context("failed to register tools")?;
    server.serve_stdio().await.context("server loop failed")?;
    Ok(())
}
