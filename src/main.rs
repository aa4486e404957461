//! # Main: CLI Entry Point
//!
//! Routes CLI subcommands to the HTTP service and database maintenance tasks.
//!
//! ## Subcommands
//!
//! - `serve`: run the REST API. Uses PostgreSQL when a database URL is
//!   configured, otherwise the in-memory registry.
//! - `migrate`: create the `pim` table.
//! - `seed`: insert the demo projects into the database.
//! - `list`: print projects from the database, optionally filtered.
//!
//! ## Global Options
//!
//! - `--database-url` / `DATABASE_URL`: PostgreSQL connection URL.
//! - `--config` / `PIMTRACK_CONFIG`: TOML configuration file.
//!
//! Command-line values override the configuration file.

mod cli;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "pimtrack", about = "Track engineering project progress over HTTP")]
struct Cli {
    /// PostgreSQL connection URL (or set DATABASE_URL env var)
    #[arg(long, env = "DATABASE_URL", global = true)]
    database_url: Option<String>,

    /// Path to a TOML configuration file
    #[arg(long, env = "PIMTRACK_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,
        /// Address to bind
        #[arg(long)]
        bind: Option<String>,
        /// Preload the demo projects
        #[arg(long)]
        seed: bool,
    },
    /// Create the project table in PostgreSQL
    Migrate,
    /// Insert the demo projects into PostgreSQL, skipping existing numbers
    Seed,
    /// Print projects stored in PostgreSQL
    List {
        /// Only projects of this team (case-insensitive)
        #[arg(long)]
        team: Option<String>,
        /// Only projects of this engineer within the team (case-insensitive)
        #[arg(long, requires = "team")]
        engineer: Option<String>,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    // Initialize structured logging: LOG_FORMAT=json for K8s, human-readable otherwise
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    let cli = Cli::parse();

    match &cli.command {
        Commands::Serve { port, bind, seed } => cli::run_serve(&cli, *port, bind.clone(), *seed),
        Commands::Migrate => cli::run_migrate(&cli),
        Commands::Seed => cli::run_seed(&cli),
        Commands::List {
            team,
            engineer,
            json,
        } => cli::run_list(&cli, team.as_deref(), engineer.as_deref(), *json),
    }
}
