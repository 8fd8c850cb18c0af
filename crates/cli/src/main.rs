//! Visible CLI - offline tools for the device catalog and widget assets.
//!
//! # Usage
//!
//! ```bash
//! # Run the device filter exactly as the MCP tool would
//! visible-cli filter --query "used pixel in black" --max-price 300
//!
//! # Filter a specific dataset file
//! visible-cli filter --data devices.json --brand iphone
//!
//! # List the colors free-text inference can recognize
//! visible-cli colors
//!
//! # Verify configuration, dataset and widget markup load
//! visible-cli check
//! ```
//!
//! Without `--data`, the dataset is located the same way the server does it
//! (see `visible_mcp_server::config`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

use commands::CliError;
use commands::filter::FilterArgs;

#[derive(Parser)]
#[command(name = "visible-cli")]
#[command(author, version, about = "Visible catalog tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter the device catalog and print the tool's structured result
    Filter {
        /// Device dataset to read instead of the configured one
        #[arg(long)]
        data: Option<PathBuf>,

        #[command(flatten)]
        args: FilterArgs,
    },
    /// Print the catalog's colors in inference order
    Colors {
        /// Device dataset to read instead of the configured one
        #[arg(long)]
        data: Option<PathBuf>,
    },
    /// Load configuration, dataset and widgets, and report what was found
    Check,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Filter { data, args } => commands::filter::run(data.as_deref(), &args),
        Commands::Colors { data } => commands::colors::run(data.as_deref()),
        Commands::Check => commands::check::run(),
    }
}
