//! rHourTracker library root.
//! Exposes the record store client, the user store, the CLI parser and the
//! high-level run() function.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod models;
pub mod remote;
pub mod store;
pub mod telemetry;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::commands;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub async fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => commands::init::handle(cli, cfg),
        Commands::Config { .. } => commands::config::handle(&cli.command, cfg),
        Commands::Login { .. } | Commands::Passwd { .. } | Commands::Forget => {
            commands::account::handle(&cli.command, cfg).await
        }
        Commands::Status => commands::status::handle(cfg).await,
        Commands::In | Commands::Out { .. } => commands::presence::handle(&cli.command, cfg).await,
        Commands::Sessions { .. } => commands::sessions::handle(&cli.command, cfg).await,
        Commands::Watch { .. } => commands::watch::handle(&cli.command, cfg).await,
        Commands::Admin { .. } => commands::admin::handle(&cli.command, cfg).await,
        Commands::Log { .. } => commands::log::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub async fn run() -> AppResult<()> {
    // 1️⃣ parse CLI
    let cli = Cli::parse();

    // 2️⃣ load config once
    let mut cfg = Config::load()?;

    // 3️⃣ command-line overrides
    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }
    if let Some(server) = &cli.server {
        cfg.server_url = server.clone();
    }

    telemetry::init_tracing(&cfg.log_level, cfg.log_json);

    // 4️⃣ hand everything to the dispatcher
    dispatch(&cli, &cfg).await
}
