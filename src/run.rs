//! Application execution logic.
//!
//! Wires the validated configuration into the transport, the Notion client,
//! the webhook queue and the HTTP facade, then serves until shutdown.

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::mpsc;

use notion_gateway::config::ValidatedConfig;
use notion_gateway::notion::{ApiError, NotionClient, RequestPipeline};
use notion_gateway::server::{AppState, router};
use notion_gateway::transport::{HttpError, ReqwestClient};
use notion_gateway::webhook::{ChannelSink, WebhookGate, WebhookPayload, process_events};

/// Receiving end of the webhook event queue.
pub type EventReceiver = mpsc::Receiver<WebhookPayload>;

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// Failed to build the HTTP transport.
    #[error("Failed to build HTTP client: {0}")]
    Transport(#[source] HttpError),

    /// Failed to build the Notion request pipeline.
    #[error("Failed to build Notion client: {0}")]
    Client(#[source] ApiError),

    /// Failed to bind the listen address.
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        /// Address we tried to bind
        addr: SocketAddr,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The server stopped with an I/O error.
    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Builds the shared application state from configuration.
///
/// Returns the state together with the receiving end of the webhook queue,
/// which the caller hands to a worker.
///
/// # Errors
///
/// Returns an error if the transport or the pipeline cannot be built.
pub fn build_state(
    config: &ValidatedConfig,
) -> Result<(AppState<ReqwestClient>, EventReceiver), RunError> {
    let http = ReqwestClient::with_timeout(config.timeout).map_err(RunError::Transport)?;

    let pipeline = RequestPipeline::new(http, &config.token)
        .map_err(RunError::Client)?
        .with_base_url(&config.base_url)
        .with_retry_policy(config.retry_policy.clone());

    let (sink, receiver) = ChannelSink::channel(config.queue_capacity);
    let gate = WebhookGate::new(config.webhook_secret.clone(), sink);

    Ok((AppState::new(NotionClient::new(pipeline), gate), receiver))
}

/// Runs the gateway until a shutdown signal arrives.
///
/// # Errors
///
/// Returns an error if startup fails or the server stops abnormally.
#[cfg(not(tarpaulin_include))]
pub async fn execute(config: ValidatedConfig) -> Result<(), RunError> {
    let (state, receiver) = build_state(&config)?;

    if !state.webhook().is_configured() {
        tracing::warn!("No webhook secret configured, webhook deliveries will be refused");
    }

    let worker = tokio::spawn(process_events(receiver));
    let app = router(Arc::new(state));

    let listener = TcpListener::bind(config.listen)
        .await
        .map_err(|source| RunError::Bind {
            addr: config.listen,
            source,
        })?;
    tracing::info!(addr = %config.listen, "Notion gateway listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(RunError::Serve)?;

    // The router owned the last sender, so the worker drains and stops.
    match worker.await {
        Ok(processed) => tracing::info!(processed, "Webhook worker finished"),
        Err(e) => tracing::error!(error = %e, "Webhook worker panicked"),
    }

    Ok(())
}

/// Completes on Ctrl+C, or SIGTERM on Unix.
#[cfg(not(tarpaulin_include))]
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    tracing::info!("Shutdown signal received, stopping...");
}
