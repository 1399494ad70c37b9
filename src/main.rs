use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fxt::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for fxt::AppCommand {
    fn from(cmd: Commands) -> fxt::AppCommand {
        match cmd {
            Commands::Rates { base } => fxt::AppCommand::Rates { base },
            Commands::Convert { amount, from, to } => fxt::AppCommand::Convert { amount, from, to },
            Commands::Watch {
                base,
                interval,
                export,
            } => fxt::AppCommand::Watch {
                base,
                interval_secs: interval,
                export,
            },
            Commands::Export { base } => fxt::AppCommand::Export { base },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Fetch and display current exchange rates
    Rates {
        /// Base currency code, overrides the configured default
        #[arg(short, long)]
        base: Option<String>,
    },
    /// Convert an amount between two currencies
    Convert {
        /// Amount in the source currency
        amount: f64,
        /// Source currency code
        from: String,
        /// Target currency code
        to: String,
    },
    /// Refresh rates periodically until interrupted
    Watch {
        /// Base currency code, overrides the configured default
        #[arg(short, long)]
        base: Option<String>,
        /// Refresh interval in seconds, overrides the configured default
        #[arg(short, long)]
        interval: Option<u64>,
        /// Export the session history to CSV on exit
        #[arg(short, long)]
        export: bool,
    },
    /// Fetch current rates and export them to CSV
    Export {
        /// Base currency code, overrides the configured default
        #[arg(short, long)]
        base: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => fxt::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

fn setup() -> anyhow::Result<()> {
    use anyhow::Context;

    let path = fxt::config::AppConfig::default_config_path()?;

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let default_config = r#"---
provider:
  base_url: "https://api.frankfurter.app"

base_currency: "USD"

display_currencies: [EUR, GBP, JPY, CHF, CAD, AUD, CNY, TRY, INR, BRL, MXN, ZAR]

refresh_interval_secs: 60
"#;

    std::fs::write(&path, default_config)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}
