//! CLI module for the API key dashboard
//!
//! - `serve`: run the HTTP server
//! - `check`: ping the key store once and print the report

pub mod check;
pub mod serve;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::config::AppConfig;

/// API Key Dashboard - manage API keys stored in a hosted Postgres table
#[derive(Parser)]
#[command(name = "api-key-dashboard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve,

    /// Check the database connection and exit
    Check,
}

/// Read `.env`, then the layered configuration
pub(crate) fn load_config() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();
    AppConfig::load().context("Failed to load configuration")
}
