mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::process;

use commands::affordability::AffordArgs;
use commands::schedule::ScheduleArgs;
use output::currency::Grouping;

/// Car loan affordability calculator
#[derive(Parser)]
#[command(
    name = "carloan",
    version,
    about = "Car loan affordability and amortization calculator",
    long_about = "Checks whether a car loan fits a monthly income budget and prints \
                  the EMI, cost breakdown and month-by-month amortization schedule \
                  using decimal arithmetic."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Digit grouping for amounts in table output
    #[arg(long, value_enum, default_value = "indian", global = true)]
    grouping: Grouping,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Check affordability and print the summary with the full schedule
    Afford(AffordArgs),
    /// Lifetime cost split: down payment, loan, interest, fuel
    Breakdown(AffordArgs),
    /// Level-payment amortization schedule for a principal, rate and term
    Schedule(ScheduleArgs),
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

fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = SimpleLogger::new().with_level(log_level(cli.verbose)).init() {
        eprintln!("{}: failed to initialise logging: {}", "warning".yellow(), e);
    }

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Afford(args) => commands::affordability::run_afford(args),
        Commands::Breakdown(args) => commands::affordability::run_breakdown(args),
        Commands::Schedule(args) => commands::schedule::run_schedule(args),
        Commands::Version => {
            println!("carloan {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, cli.grouping, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
