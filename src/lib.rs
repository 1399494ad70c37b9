pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod log;
pub mod providers;
pub mod rate_provider;
pub mod tracker;
pub mod watch;

use crate::providers::FrankfurterProvider;
use crate::tracker::{RateTracker, validate_conversion};
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

pub enum AppCommand {
    Rates {
        base: Option<String>,
    },
    Convert {
        amount: f64,
        from: String,
        to: String,
    },
    Watch {
        base: Option<String>,
        interval_secs: Option<u64>,
        export: bool,
    },
    Export {
        base: Option<String>,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Currency tracker starting...");

    let config = match config_path {
        Some(path) => config::AppConfig::load_from_path(path)?,
        None => config::AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let provider = Arc::new(FrankfurterProvider::new(&config.provider.base_url));
    let tracker = RateTracker::new(provider);

    match command {
        AppCommand::Rates { base } => {
            let base = resolve_base(base, &config);
            let snapshot = {
                let spinner = cli::ui::new_spinner("Fetching exchange rates...");
                let result = tracker.fetch_and_record(&base).await;
                spinner.finish_and_clear();
                result?
            };
            println!(
                "{}",
                cli::rates::render_snapshot(&snapshot, &config.display_currencies)
            );
            Ok(())
        }
        AppCommand::Convert { amount, from, to } => {
            let from = from.to_uppercase();
            let to = to.to_uppercase();
            validate_conversion(amount, &from, &to)?;

            let converted = {
                let spinner = cli::ui::new_spinner("Converting...");
                let result = tracker.convert(amount, &from, &to).await;
                spinner.finish_and_clear();
                result?
            };
            println!("{}", cli::convert::render_conversion(amount, &from, converted, &to));
            Ok(())
        }
        AppCommand::Watch {
            base,
            interval_secs,
            export,
        } => {
            let base = resolve_base(base, &config);
            let interval =
                Duration::from_secs(interval_secs.unwrap_or(config.refresh_interval_secs));
            watch::run(&tracker, &config, &base, interval, export).await
        }
        AppCommand::Export { base } => {
            let base = resolve_base(base, &config);
            let snapshot = {
                let spinner = cli::ui::new_spinner("Fetching exchange rates...");
                let result = tracker.fetch_and_record(&base).await;
                spinner.finish_and_clear();
                result?
            };

            let dir = config.export_dir.clone().unwrap_or_else(|| PathBuf::from("."));
            let history = tracker.history().await;
            let paths = export::export_csv(&dir, &snapshot, &history)?;
            println!(
                "{}",
                cli::ui::style_text(
                    &format!("Exported rates to {}", paths.current.display()),
                    cli::ui::StyleType::Success
                )
            );
            Ok(())
        }
    }
}

fn resolve_base(base: Option<String>, config: &config::AppConfig) -> String {
    base.unwrap_or_else(|| config.base_currency.clone())
        .to_uppercase()
}
