//! Ferroscan CLI entry point
//!
//! Ferroscan CLI runs hybrid vulnerability analysis over a project
//! directory: external static-analysis tools and a language-model
//! reviewer in parallel, merged into one de-duplicated report.

mod commands;

use clap::{Parser, Subcommand};
use ferroscan_core::config::Config;
use tracing_subscriber::EnvFilter;

/// Process exit codes, stable for CI consumption.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const VULNERABILITIES_FOUND: i32 = 1;
    pub const CONFIG_ERROR: i32 = 2;
    pub const ANALYSIS_FAILED: i32 = 3;
    pub const INTERNAL_ERROR: i32 = 4;
}

/// Ferroscan CLI runs hybrid vulnerability analysis over legacy codebases
#[derive(Parser, Debug)]
#[command(name = "ferroscan", version, about)]
pub struct Cli {
    /// Output format (text, json)
    #[arg(long, global = true, default_value = "text")]
    pub format: String,

    /// Suppress progress output
    #[arg(long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run full vulnerability analysis on a project directory
    Scan(commands::scan::ScanArgs),
    /// List configured analyzers and whether each will run
    Analyzers,
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {e}");
            std::process::exit(exit_codes::CONFIG_ERROR);
        }
    };

    init_tracing(&config.logging.level);

    let result = match &cli.command {
        Commands::Scan(args) => commands::scan::run(&cli, &config, args).await,
        Commands::Analyzers => commands::analyzers::run(&cli, &config),
    };

    let code = match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            exit_codes::INTERNAL_ERROR
        }
    };
    std::process::exit(code);
}
