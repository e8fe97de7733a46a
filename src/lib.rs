pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::AppConfig;
use crate::core::validation::FormCandidate;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    /// Check a single investment
    Check {
        amount: String,
        date: String,
        currency: Option<String>,
        asset: Option<String>,
    },
    /// List supported currencies and assets
    Options,
    /// Read checks interactively from stdin
    Prompt,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Crypto profit checker starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Check {
            amount,
            date,
            currency,
            asset,
        } => {
            let candidate = FormCandidate {
                principal: amount,
                currency: currency.unwrap_or_else(|| config.defaults.currency.clone()),
                asset: asset.unwrap_or_else(|| config.defaults.asset.clone()),
                past_date: date,
            };
            let provider = config.price_provider();
            cli::check::run(&candidate, &config.validator(), &provider).await
        }
        AppCommand::Options => {
            cli::options::run();
            Ok(())
        }
        AppCommand::Prompt => {
            let provider = Arc::new(config.price_provider());
            cli::prompt::run(provider, config.validator(), &config.defaults).await
        }
    }
}
