pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::AppConfig;
use crate::core::state::AppState;
use crate::core::Session;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Rates,
    Convert {
        amount: String,
        from: String,
        to: String,
    },
    Random {
        amount: Option<String>,
    },
    Interactive,
}

pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");
    Ok(config)
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Kantor starting...");

    let config = load_config(config_path)?;
    let provider = Arc::new(
        providers::nbp::NbpProvider::new(&config.providers.nbp)
            .context("Failed to create HTTP client")?,
    );
    let mut stdout = std::io::stdout();

    match command {
        AppCommand::Rates => cli::commands::rates(provider, &mut stdout).await,
        AppCommand::Convert { amount, from, to } => {
            cli::commands::convert(provider, &amount, &from, &to, &mut stdout).await
        }
        AppCommand::Random { amount } => {
            let amount = amount.unwrap_or(config.amount);
            cli::commands::random(provider, &amount, &mut stdout).await
        }
        AppCommand::Interactive => {
            println!("{}", cli::interactive::HELP);
            let mut session = Session::new(provider, AppState::with_amount(&config.amount));
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            cli::interactive::run(&mut session, stdin, &mut stdout).await
        }
    }
}
