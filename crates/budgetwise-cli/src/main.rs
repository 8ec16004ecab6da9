mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::bills::{NextDueArgs, OccurrencesArgs};
use commands::payoff::{CompareArgs, ConsolidateArgs, PayoffArgs};
use commands::projection::ProjectArgs;

/// Financial forecasting and debt payoff simulation
#[derive(Parser)]
#[command(
    name = "bw",
    version,
    about = "Financial forecasting and debt payoff simulation",
    long_about = "A CLI for the budgetwise forecasting engine. Simulates multi-debt \
                  payoff strategies (avalanche/snowball with surplus rollover), compares \
                  strategies, analyzes consolidation, advances bill recurrences, and \
                  projects cash flow — all with decimal precision."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a multi-debt payoff under a fixed monthly budget
    Payoff(PayoffArgs),
    /// Run avalanche and snowball side by side and recommend one
    Compare(CompareArgs),
    /// Analyze consolidating all debts into a single loan
    Consolidate(ConsolidateArgs),
    /// Advance a bill's due date to its next occurrence
    NextDue(NextDueArgs),
    /// List a bill's occurrences inside a date window
    Occurrences(OccurrencesArgs),
    /// Project a running balance across recurring bills
    Project(ProjectArgs),
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

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Payoff(args) => commands::payoff::run_payoff(args),
        Commands::Compare(args) => commands::payoff::run_compare(args),
        Commands::Consolidate(args) => commands::payoff::run_consolidate(args),
        Commands::NextDue(args) => commands::bills::run_next_due(args),
        Commands::Occurrences(args) => commands::bills::run_occurrences(args),
        Commands::Project(args) => commands::projection::run_project(args),
        Commands::Version => {
            println!("bw {}", env!("CARGO_PKG_VERSION"));
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
