//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use http::HeaderValue;
use url::Url;

use crate::notion::RetryPolicy;

use super::cli::Cli;
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

/// Fully validated configuration ready for use by the application.
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and an
/// optional TOML config. Secrets are redacted from `Debug` and `Display`.
pub struct ValidatedConfig {
    /// Notion integration token (required, non-empty)
    pub token: String,

    /// Notion API base URL
    pub base_url: Url,

    /// Timeout applied to every HTTP attempt
    pub timeout: Duration,

    /// Webhook signing secret. `None` keeps the webhook gate closed.
    pub webhook_secret: Option<String>,

    /// Capacity of the webhook event queue
    pub queue_capacity: usize,

    /// Bind address of the HTTP facade
    pub listen: SocketAddr,

    /// Retry policy for transient Notion failures
    pub retry_policy: RetryPolicy,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Debug for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatedConfig")
            .field("token", &"<redacted>")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("webhook_secret", &self.webhook_secret.as_ref().map(|_| "<redacted>"))
            .field("queue_capacity", &self.queue_capacity)
            .field("listen", &self.listen)
            .field("retry_policy", &self.retry_policy)
            .field("verbose", &self.verbose)
            .finish()
    }
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Config {{ base_url: {}, listen: {}, timeout: {}s, webhook: {}, queue: {}, \
             retry: {}x/{}s*{} }}",
            self.base_url,
            self.listen,
            self.timeout.as_secs(),
            if self.webhook_secret.is_some() { "enabled" } else { "disabled" },
            self.queue_capacity,
            self.retry_policy.max_retries,
            self.retry_policy.initial_delay.as_secs_f64(),
            self.retry_policy.backoff_factor,
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values, which take
    /// precedence over [`defaults`].
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The token is missing, empty or not a valid header value
    /// - The base URL does not parse
    /// - The timeout is zero
    /// - The retry settings are negative or not finite
    /// - The queue capacity is zero
    /// - The listen address is not a socket address
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let token = Self::resolve_token(cli, toml)?;
        let base_url = Self::resolve_base_url(cli, toml)?;
        let timeout = Self::resolve_timeout(cli, toml)?;

        // An empty secret is the same as no secret at all.
        let webhook_secret = cli
            .webhook_secret
            .clone()
            .or_else(|| toml.and_then(|t| t.webhook.secret.clone()))
            .filter(|s| !s.is_empty());

        let queue_capacity = toml
            .and_then(|t| t.webhook.queue_capacity)
            .unwrap_or(defaults::QUEUE_CAPACITY);
        if queue_capacity == 0 {
            return Err(ConfigError::InvalidQueueCapacity);
        }

        let listen = Self::resolve_listen(cli, toml)?;
        let retry_policy = Self::build_retry_policy(cli, toml)?;

        Ok(Self {
            token,
            base_url,
            timeout,
            webhook_secret,
            queue_capacity,
            listen,
            retry_policy,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    fn resolve_token(cli: &Cli, toml: Option<&TomlConfig>) -> Result<String, ConfigError> {
        let token = cli
            .token
            .as_deref()
            .or_else(|| toml.and_then(|t| t.notion.token.as_deref()))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                ConfigError::missing(
                    field::TOKEN,
                    "Use --token, NOTION_API_TOKEN or set notion.token in config file",
                )
            })?;

        HeaderValue::from_str(&format!("Bearer {token}")).map_err(|e| {
            ConfigError::InvalidToken {
                reason: e.to_string(),
            }
        })?;

        Ok(token.to_string())
    }

    fn resolve_base_url(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Url, ConfigError> {
        let url_str = cli
            .base_url
            .as_deref()
            .or_else(|| toml.and_then(|t| t.notion.base_url.as_deref()))
            .unwrap_or(defaults::BASE_URL);

        Url::parse(url_str).map_err(|e| ConfigError::InvalidUrl {
            url: url_str.to_string(),
            reason: e.to_string(),
        })
    }

    fn resolve_timeout(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Duration, ConfigError> {
        let seconds = cli
            .timeout
            .or_else(|| toml.and_then(|t| t.notion.timeout))
            .unwrap_or(defaults::TIMEOUT_SECS);

        if seconds == 0 {
            return Err(ConfigError::InvalidDuration {
                field: field::TIMEOUT,
                reason: "must be greater than 0".to_string(),
            });
        }

        Ok(Duration::from_secs(seconds))
    }

    fn resolve_listen(cli: &Cli, toml: Option<&TomlConfig>) -> Result<SocketAddr, ConfigError> {
        let listen = cli
            .listen
            .as_deref()
            .or_else(|| toml.and_then(|t| t.server.listen.as_deref()))
            .unwrap_or(defaults::LISTEN);

        listen
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidListen {
                value: listen.to_string(),
                reason: e.to_string(),
            })
    }

    fn build_retry_policy(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<RetryPolicy, ConfigError> {
        let retry = toml.map(|t| &t.retry);

        let max_retries = cli
            .retry_max
            .or_else(|| retry.and_then(|r| r.max_retries))
            .unwrap_or(defaults::RETRY_MAX_RETRIES);

        let initial_delay_secs = cli
            .retry_delay
            .or_else(|| retry.and_then(|r| r.initial_delay))
            .unwrap_or(defaults::RETRY_INITIAL_DELAY_SECS);

        let backoff_factor = retry
            .and_then(|r| r.backoff_factor)
            .unwrap_or(defaults::RETRY_BACKOFF_FACTOR);

        let initial_delay = Duration::try_from_secs_f64(initial_delay_secs).map_err(|e| {
            ConfigError::InvalidDuration {
                field: field::INITIAL_DELAY,
                reason: e.to_string(),
            }
        })?;

        if backoff_factor <= 0.0 || !backoff_factor.is_finite() {
            return Err(ConfigError::InvalidRetry(
                "backoff_factor must be a positive finite number".to_string(),
            ));
        }

        Ok(RetryPolicy::new()
            .with_max_retries(max_retries)
            .with_initial_delay(initial_delay)
            .with_backoff_factor(backoff_factor))
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}
