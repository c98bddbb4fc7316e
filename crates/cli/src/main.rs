// conciliar - DEBO ↔ platform coupon reconciliation (headless)

mod exit_codes;
mod recon;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use exit_codes::EXIT_SUCCESS;

#[derive(Parser)]
#[command(name = "conciliar")]
#[command(about = "Reconcile the DEBO ledger against a platform settlement report")]
#[command(version)]
struct Cli {
    /// Log debug details to stderr (overrides CONCILIAR_LOG)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile a ledger file against a platform file (exit 0 = reconciled, exit 1 = discrepancies)
    #[command(after_help = "\
Examples:
  conciliar run --ledger DEBO.xlsx --platform MELI.xlsx
  conciliar run -l DEBO.xlsx -p appypf.csv --export
  conciliar run -l DEBO.xlsx -p clover.xlsx --label CLOVER --output clover.csv
  conciliar run -l DEBO.xlsx -p MELI.xlsx --config recon.toml --json")]
    Run(recon::RunArgs),

    /// Validate a reconciliation config without running
    #[command(after_help = "\
Examples:
  conciliar validate recon.toml")]
    Validate {
        /// Path to the TOML config file
        config: PathBuf,
    },
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("CONCILIAR_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // The fmt subscriber also bridges `log` records from the library crates.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run(args) => recon::cmd_run(args),
        Commands::Validate { config } => recon::cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}
