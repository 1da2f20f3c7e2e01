use cambio::cli::convert::print_alert;
use cambio::core::log::init_logging;
use cambio::core::{ConversionError, CurrencyCode};
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    /// Append INFO level logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Convert an amount using the latest quote
    Convert {
        /// Amount to convert, e.g. 100 or 12,50
        amount: String,
        /// Origin currency, defaults to the last one used
        #[arg(short, long)]
        from: Option<CurrencyCode>,
        /// Destination currency, defaults to the last one used
        #[arg(short, long)]
        to: Option<CurrencyCode>,
    },
    /// Convert amounts one after another
    Interactive {
        #[arg(short, long)]
        from: Option<CurrencyCode>,
        #[arg(short, long)]
        to: Option<CurrencyCode>,
    },
    /// List supported currencies
    Currencies,
}

impl From<Commands> for cambio::AppCommand {
    fn from(cmd: Commands) -> cambio::AppCommand {
        match cmd {
            Commands::Convert { amount, from, to } => {
                cambio::AppCommand::Convert { amount, from, to }
            }
            Commands::Interactive { from, to } => cambio::AppCommand::Interactive { from, to },
            Commands::Currencies => cambio::AppCommand::Currencies,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose, cli.log_file.as_deref()) {
        eprintln!("{e:#}");
    }

    let result = match cli.command {
        Some(Commands::Setup) => cambio::cli::setup::setup(),
        Some(cmd) => cambio::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => Cli::command().print_help().map_err(anyhow::Error::from),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Application failed");
            // Conversion failures have already been shown to the user.
            if e.downcast_ref::<ConversionError>().is_none() {
                print_alert(&ConversionError::from(e));
            }
            ExitCode::FAILURE
        }
    }
}
