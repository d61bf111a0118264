//! Configuration layer for the gateway.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** (including the `NOTION_API_TOKEN` and
//!    `NOTION_WEBHOOK_SECRET` environment variables, which back their flags)
//! 2. **TOML config file**
//! 3. **Built-in defaults**
//!
//! The token is the only required value. `webhook.queue_capacity` and
//! `retry.backoff_factor` are TOML-only.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;


pub use cli::{Cli, Command};
pub use error::{ConfigError, field};
pub use toml::{
    NotionSection, RetrySection, ServerSection, TomlConfig, WebhookSection,
    default_config_template,
};
pub use validated::{ValidatedConfig, write_default_config};
