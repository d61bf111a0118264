//! Transport layer: the one shared outbound HTTP resource.
//!
//! This module provides:
//! - Request/response values ([`HttpRequest`], [`HttpResponse`])
//! - The client abstraction ([`HttpClient`])
//! - Connectivity failures ([`HttpError`])
//! - The pooled production implementation ([`ReqwestClient`])

mod client;
mod error;
mod message;

#[cfg(test)]
mod client_tests;

pub use client::ReqwestClient;
pub use error::HttpError;
pub use message::{HttpClient, HttpRequest, HttpResponse};
