use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use kantor::core::log::init_logging;

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

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// List the latest published mid rates
    Rates,
    /// Convert an amount and show the pair's recent history
    Convert {
        /// Amount in the source currency
        amount: String,
        /// Source currency code, e.g. USD
        from: String,
        /// Target currency code, e.g. EUR
        to: String,
    },
    /// Pick a random currency pair
    Random {
        /// Amount in the source currency
        amount: Option<String>,
    },
    /// Run an interactive converter session
    Interactive,
}

impl From<Commands> for kantor::AppCommand {
    fn from(cmd: Commands) -> kantor::AppCommand {
        match cmd {
            Commands::Rates => kantor::AppCommand::Rates,
            Commands::Convert { amount, from, to } => {
                kantor::AppCommand::Convert { amount, from, to }
            }
            Commands::Random { amount } => kantor::AppCommand::Random { amount },
            Commands::Interactive => kantor::AppCommand::Interactive,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => kantor::cli::setup::setup(),
        Some(cmd) => kantor::run_command(cmd.into(), cli.config_path.as_deref()).await,
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
