//! TOML configuration file parsing.

use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional so a file may configure only part of the
/// gateway and leave the rest to CLI arguments and defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Notion API access
    #[serde(default)]
    pub notion: NotionSection,

    /// Webhook intake
    #[serde(default)]
    pub webhook: WebhookSection,

    /// HTTP facade
    #[serde(default)]
    pub server: ServerSection,

    /// Retry policy configuration
    #[serde(default)]
    pub retry: RetrySection,
}

/// Notion API section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotionSection {
    /// Integration token
    pub token: Option<String>,

    /// API base URL
    pub base_url: Option<String>,

    /// Per-attempt timeout in seconds
    pub timeout: Option<u64>,
}

/// Webhook section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WebhookSection {
    /// Shared signing secret
    pub secret: Option<String>,

    /// Capacity of the event queue
    pub queue_capacity: Option<usize>,
}

/// Server section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    /// Bind address, e.g. `127.0.0.1:8000`
    pub listen: Option<String>,
}

/// Retry policy configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetrySection {
    /// Maximum number of retries
    pub max_retries: Option<u32>,

    /// Initial retry delay in seconds
    pub initial_delay: Option<f64>,

    /// Backoff factor
    pub backoff_factor: Option<f64>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# Notion Gateway Configuration File

[notion]
# Integration token (required; NOTION_API_TOKEN or --token also work)
# token = "secret_..."

# API base URL (default: https://api.notion.com/v1)
# base_url = "https://api.notion.com/v1"

# Per-attempt request timeout in seconds (default: 30)
timeout = 30

[webhook]
# Shared secret for x-notion-signature verification.
# Without it every webhook delivery is refused with 500.
# secret = "whsec_..."

# Capacity of the in-memory event queue (default: 1024)
# queue_capacity = 1024

[server]
# Bind address of the HTTP facade (default: 127.0.0.1:8000)
listen = "127.0.0.1:8000"

[retry]
# Retries for rate limiting, 503 and timeouts (default: 3)
# max_retries = 3

# Delay before the first retry in seconds (default: 1.0)
# initial_delay = 1.0

# Factor applied to the delay after each retry (default: 2.0)
# backoff_factor = 2.0
"#
    .to_string()
}
