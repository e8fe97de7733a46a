use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use cryptoprofit::cli::setup::setup;
use cryptoprofit::core::log::init_logging;

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

impl From<Commands> for cryptoprofit::AppCommand {
    fn from(cmd: Commands) -> cryptoprofit::AppCommand {
        match cmd {
            Commands::Check {
                amount,
                date,
                currency,
                asset,
            } => cryptoprofit::AppCommand::Check {
                amount,
                date,
                currency,
                asset,
            },
            Commands::Options => cryptoprofit::AppCommand::Options,
            Commands::Prompt => cryptoprofit::AppCommand::Prompt,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Show what an investment made on a past date is worth today
    Check {
        /// Amount invested, e.g. 1500 or 1,500.50
        #[arg(short, long)]
        amount: String,
        /// Date of the investment (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,
        /// Fiat currency code, e.g. usd
        #[arg(long)]
        currency: Option<String>,
        /// Crypto asset id or symbol, e.g. bitcoin or btc
        #[arg(long)]
        asset: Option<String>,
    },
    /// List supported currencies and assets
    Options,
    /// Check investments interactively, one per line
    Prompt,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(cli.config_path.as_deref()),
        Some(cmd) => cryptoprofit::run_command(cmd.into(), cli.config_path.as_deref()).await,
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
