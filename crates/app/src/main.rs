//! `pmdash` - command line client for the PM Dashboard API

use anyhow::Context;
use clap::Parser;
use pmdash_domain::Config;
use pmdash_lib::cli::{dispatch, Cli};
use pmdash_lib::utils::{init_tracing, LogFormat};
use pmdash_lib::AppContext;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is not an error
    dotenvy::dotenv().ok();
    init_tracing(LogFormat::from_env(), "info")?;

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let ctx = AppContext::new(config).context("failed to initialize application")?;
    let output = dispatch(&ctx, cli.command).await?;

    #[allow(clippy::print_stdout)]
    {
        println!("{}", serde_json::to_string_pretty(&output)?);
    }
    Ok(())
}

/// An explicit `--config` must load; otherwise fall back to defaults.
fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    if let Some(path) = &cli.config {
        let config = pmdash_infra::config::load_from_file(Some(path.clone()))
            .with_context(|| format!("failed to load config from {}", path.display()))?;
        info!(path = %path.display(), "Configuration loaded from file");
        return Ok(config);
    }

    match pmdash_infra::config::load() {
        Ok(config) => Ok(config),
        Err(e) => {
            warn!(error = %e, "No configuration found, using defaults");
            Ok(Config::default())
        }
    }
}
