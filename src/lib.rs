//! Notion gateway
//!
//! A typed client for the Notion REST API with a uniform error taxonomy and
//! retry policy, an HMAC-verified webhook intake, and an axum facade that
//! exposes both over HTTP.
//!
//! - [`transport`]: the pluggable HTTP layer ([`transport::HttpClient`])
//! - [`notion`]: request pipeline, errors, retries, models and resource operations
//! - [`webhook`]: signature checks and the bounded event queue
//! - [`server`]: the HTTP routes
//! - [`config`]: CLI, TOML and validated settings

pub mod config;
pub mod notion;
pub mod server;
pub mod time;
pub mod transport;
pub mod webhook;
