//! Web facade over the Notion client.
//!
//! Each route delegates to one [`NotionClient`](crate::notion::NotionClient)
//! operation; `POST /webhooks` goes through the
//! [`WebhookGate`](crate::webhook::WebhookGate).

mod error;
mod routes;


pub use error::RouteError;
pub use routes::{AppState, router};
