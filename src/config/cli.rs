//! CLI argument parsing using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Notion gateway: a typed Notion API client behind a small HTTP facade.
///
/// Proxies database, page, block, comment and user operations to the
/// Notion API and accepts signed webhook deliveries.
#[derive(Debug, Default, Parser)]
#[command(name = "notion-gateway")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to configuration file
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Notion integration token
    #[arg(long, env = "NOTION_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Base URL of the Notion API
    #[arg(long = "base-url")]
    pub base_url: Option<String>,

    /// Per-attempt request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Shared secret used to verify webhook signatures
    #[arg(long = "webhook-secret", env = "NOTION_WEBHOOK_SECRET", hide_env_values = true)]
    pub webhook_secret: Option<String>,

    /// Address the HTTP facade listens on
    #[arg(long, value_name = "ADDR")]
    pub listen: Option<String>,

    /// Maximum number of retries for transient failures
    #[arg(long = "retry-max")]
    pub retry_max: Option<u32>,

    /// Delay before the first retry in seconds (fractions allowed)
    #[arg(long = "retry-delay")]
    pub retry_delay: Option<f64>,

    /// Enable verbose logging
    #[arg(long, short)]
    pub verbose: bool,
}

/// Subcommands for notion-gateway
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = "notion-gateway.toml")]
        output: PathBuf,
    },
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Some(Command::Init { .. }))
    }
}
