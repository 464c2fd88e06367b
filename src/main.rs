//! # Charty CLI (`charty`)
//!
//! The `charty` binary runs the donation transparency dashboard. It provides
//! commands for initializing the store, serving the public and admin pages,
//! and printing a summary of what the store currently holds.
//!
//! ## Usage
//!
//! ```bash
//! charty --config ./config/charty.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `charty init` | Create the configured store and seed the default record |
//! | `charty serve` | Start the HTTP server (public page, admin panel, ledger) |
//! | `charty stats` | Print counter values and ledger totals |
//!
//! ## Examples
//!
//! ```bash
//! # Seed the store (JSON files or SQLite, per config)
//! charty init --config ./config/charty.toml
//!
//! # Serve the dashboard
//! charty serve --config ./config/charty.toml
//!
//! # Inspect the store from the terminal
//! charty stats --config ./config/charty.toml
//! ```

mod actions;
mod config;
mod db;
mod file_store;
mod migrate;
mod pages;
mod server;
mod session;
mod sqlite_store;
mod stats;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Charty — a transparency dashboard for a donation-backed initiative.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/charty.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "charty",
    about = "Charty — a transparency dashboard for a donation-backed initiative",
    version,
    long_about = "Charty serves a public dashboard of live donation counters, success stories, \
    and project progress, backed by a password-gated admin panel and an income/expense ledger. \
    Records live in JSON files or SQLite and self-heal on every load."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/charty.toml`. Store, server, and admin settings
    /// are read from this file.
    #[arg(long, global = true, default_value = "./config/charty.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the configured store.
    ///
    /// Creates the data directory (and, for the sqlite backend, the database
    /// schema), then loads the store once so the default record and an empty
    /// ledger are seeded. This command is idempotent.
    Init,

    /// Start the HTTP server.
    ///
    /// Binds to the address configured in `[server].bind` and serves the
    /// public dashboard, the admin panel, and the ledger page.
    Serve,

    /// Print a summary of the store.
    ///
    /// Shows counter values, story count, and a per-kind breakdown of
    /// ledger entries.
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "charty=info,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            let store = db::build_store(&cfg).await?;
            store.load_store().await?;
            store.load_details().await?;
            println!("Store initialized successfully.");
        }
        Commands::Serve => {
            let store = db::build_store(&cfg).await?;
            server::run_server(&cfg, store).await?;
        }
        Commands::Stats => {
            stats::run_stats(&cfg).await?;
        }
    }

    Ok(())
}
