//! Mapping of client failures onto facade responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::notion::{ApiError, ErrorKind};

/// Error returned by resource routes.
#[derive(Debug, Error)]
pub enum RouteError {
    /// The Notion call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The request body is not valid JSON for this route.
    #[error("Invalid request body: {0}")]
    InvalidBody(#[source] serde_json::Error),
}

impl RouteError {
    /// HTTP status answered for this error.
    ///
    /// Taxonomy kinds keep the provider's status. Provider statuses without
    /// a kind and failed exchanges become 502, timeouts 504, unusable ids
    /// 400, and other local faults 500.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidBody(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Api(error) => match (error.kind(), error) {
                (_, ApiError::InvalidId { .. }) => StatusCode::BAD_REQUEST,
                (ErrorKind::Generic, ApiError::Transport(e)) if e.is_timeout() => {
                    StatusCode::GATEWAY_TIMEOUT
                }
                (
                    ErrorKind::Generic,
                    ApiError::Unexpected(_) | ApiError::Transport(_) | ApiError::Deserialization(_),
                ) => StatusCode::BAD_GATEWAY,
                (ErrorKind::Generic, _) => StatusCode::INTERNAL_SERVER_ERROR,
                (_, error) => error.status().unwrap_or(StatusCode::BAD_GATEWAY),
            },
        }
    }
}

impl IntoResponse for RouteError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Route failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "Route failed");
        }
        (status, Json(json!({"detail": self.to_string()}))).into_response()
    }
}
