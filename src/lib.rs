pub mod cli;
pub mod core;
pub mod providers;

use crate::core::CurrencyCode;
use crate::core::config::AppConfig;
use anyhow::Result;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, error, info};

#[derive(Debug, Clone)]
pub enum AppCommand {
    Convert {
        amount: String,
        from: Option<CurrencyCode>,
        to: Option<CurrencyCode>,
    },
    Interactive {
        from: Option<CurrencyCode>,
        to: Option<CurrencyCode>,
    },
    Currencies,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Currency converter starting...");

    let config_path = match config_path {
        Some(path) => PathBuf::from(path),
        None => AppConfig::default_config_path()?,
    };
    let mut config = AppConfig::load_or_default(&config_path);
    debug!("Loaded config: {config:#?}");

    let (saved_origin, saved_destination) = config.selected_pair();
    let provider = providers::AwesomeApiProvider::new(
        &config.provider.base_url,
        Duration::from_secs(config.provider.timeout_secs),
    )?;

    let (result, origin, destination) = match command {
        AppCommand::Convert { amount, from, to } => {
            let origin = from.unwrap_or(saved_origin);
            let destination = to.unwrap_or(saved_destination);
            let result =
                cli::convert::convert_and_display(&provider, &amount, &origin, &destination)
                    .await
                    .map(|_| ())
                    .map_err(anyhow::Error::from);
            (result, origin, destination)
        }
        AppCommand::Interactive { from, to } => {
            let origin = from.unwrap_or(saved_origin);
            let destination = to.unwrap_or(saved_destination);
            match cli::interactive::run(&provider, origin.clone(), destination.clone()).await {
                Ok((origin, destination)) => (Ok(()), origin, destination),
                Err(e) => (Err(e), origin, destination),
            }
        }
        AppCommand::Currencies => {
            println!(
                "{}",
                cli::currencies::currencies_table(&saved_origin, &saved_destination)
            );
            return Ok(());
        }
    };

    config.remember_pair(&origin, &destination);
    if let Err(e) = config.save_to_path(&config_path) {
        error!("Failed to save configuration: {e:#}");
    }

    result
}
