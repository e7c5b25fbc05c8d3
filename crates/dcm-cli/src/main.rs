mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::io;
use std::process;

use commands::model::AssumptionArgs;

/// Data-center unit economics
#[derive(Parser)]
#[command(
    name = "dcm",
    version,
    about = "Data-center unit economics",
    long_about = "Estimate the steady-state P&L, cash flows, payback, IRR and ROIC of a \
                  data-center capital investment from per-GW assumptions, with decimal \
                  precision. Unset flags take the 1 GW reference scenario."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log solver and input details to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Steady-state annual P&L
    Pnl(AssumptionArgs),
    /// Multi-year cash-flow projection with payback, IRR and ROIC
    CashFlow(AssumptionArgs),
    /// Full model: P&L, power breakdown, cash flows, returns and summary
    Model(AssumptionArgs),
    /// List the accepted range of every assumption
    Ranges,
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Pnl(args) => commands::model::run_pnl(args),
        Commands::CashFlow(args) => commands::model::run_cash_flow(args),
        Commands::Model(args) => commands::model::run_full_model(args),
        Commands::Ranges => commands::model::run_ranges(),
        Commands::Version => {
            println!("dcm {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
