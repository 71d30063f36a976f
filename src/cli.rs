// src/cli.rs
use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::core::{ConfigManager, EnvSecrets, StatusClient};
use crate::tracker::{BatchReport, Tracker};

#[derive(Parser, Debug)]
#[command(name = "apptrack")]
#[command(about = "Append job application status snapshots to per-company logs")]
pub struct TrackerCli {
    /// Companies configuration file
    #[arg(short, long, default_value = "companies.json")]
    pub config: PathBuf,

    /// Directory receiving the `<company>.txt` logs
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Only process these companies (repeatable)
    #[arg(long = "company", value_name = "NAME")]
    pub companies: Vec<String>,

    /// Dotenv file to load secrets from instead of ./.env
    #[arg(long)]
    pub env_file: Option<PathBuf>,

    /// Write JSON logs to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

const DEFAULT_ENV_FILE: &str = ".env";

fn load_env_file(cli: &TrackerCli) -> Result<()> {
    match &cli.env_file {
        Some(path) => {
            dotenvy::from_path(path)
                .with_context(|| format!("Failed to load env file: {}", path.display()))?;
            info!("Loaded environment from {}", path.display());
        }
        None => load_optional_env_file(Path::new(DEFAULT_ENV_FILE))?,
    }
    Ok(())
}

/// Load `path` if it exists. Any other error, a parse error included, is returned.
fn load_optional_env_file(path: &Path) -> Result<()> {
    match dotenvy::from_path(path) {
        Ok(()) => {
            info!("Loaded environment from {}", path.display());
            Ok(())
        }
        Err(e) if e.not_found() => Ok(()),
        Err(e) => {
            Err(e).with_context(|| format!("Failed to load env file: {}", path.display()))
        }
    }
}

/// Run one batch as described by the command line
pub async fn handle_tracker_command(cli: TrackerCli) -> Result<BatchReport> {
    load_env_file(&cli)?;

    let mut config = ConfigManager::load(&cli.config)?;
    for name in config.retain_companies(&cli.companies) {
        warn!("No company named {} in {}", name, cli.config.display());
    }

    let client = StatusClient::new(config.request_timeout_secs)?;
    let tracker = Tracker::new(client, EnvSecrets, cli.output_dir);

    Ok(tracker.run(&config.companies).await)
}
