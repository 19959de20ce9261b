//! E-Shop CLI - Database migrations and seeding tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! eshop-cli migrate
//!
//! # Seed items from a YAML file
//! eshop-cli seed --file items.yaml
//!
//! # Seed after clearing existing items and orders
//! eshop-cli seed --file items.yaml --clear
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Seed the items table from a YAML file

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "eshop-cli")]
#[command(author, version, about = "E-Shop CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the items table from a YAML file
    Seed {
        /// Path to the YAML file with items to seed
        #[arg(short, long)]
        file: String,

        /// Clear existing items and orders before seeding
        #[arg(long)]
        clear: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { file, clear } => commands::seed::items(&file, clear).await?,
    }
    Ok(())
}
