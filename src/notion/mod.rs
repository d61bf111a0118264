//! Notion API client.
//!
//! Layers, bottom up:
//! - [`ApiError`]: the error taxonomy every failed call resolves into
//! - [`RetryPolicy`]: bounded exponential backoff for transient failures
//! - [`RequestPipeline`]: the single outbound request primitive
//! - [`NotionClient`]: typed resource operations built on the pipeline

mod client;
mod error;
pub mod ids;
pub mod models;
mod pipeline;
mod retry;

#[cfg(test)]
mod error_tests;
#[cfg(test)]
mod pipeline_tests;
#[cfg(test)]
mod retry_tests;
#[cfg(test)]
pub(crate) mod test_fixtures;

pub use client::NotionClient;
pub use error::{ApiError, ErrorDetails, ErrorKind, UNKNOWN_ERROR_MESSAGE};
pub use pipeline::{
    ApiRequest, DEFAULT_BASE_URL, NOTION_API_VERSION, NOTION_VERSION_HEADER, RequestPipeline,
};
pub use retry::RetryPolicy;
