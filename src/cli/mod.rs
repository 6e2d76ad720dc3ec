//! CLI module for Account Portal
//!
//! Subcommands:
//! - `serve`: run the web server
//! - `migrate`: apply or revert database migrations
//! - `purge-sessions`: drop expired sessions

pub mod migrate;
pub mod serve;
pub mod sessions;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Account Portal - registration, login and sessions
#[derive(Parser)]
#[command(name = "account-portal")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the web server
    Serve,

    /// Apply pending database migrations
    Migrate(migrate::MigrateArgs),

    /// Delete expired sessions from the configured store
    PurgeSessions,
}

/// Load `.env` and configuration, then start logging
fn bootstrap() -> AppConfig {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&config.logging);

    config
}
