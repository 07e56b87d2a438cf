//! Error taxonomy for the gateway.
//!
//! # Classes
//! - `ConfigError`: fatal, startup only. The process exits before binding.
//! - `GatewayError`: per request. Always converted into a JSON envelope at the
//!   request boundary (see `http::envelope`), never propagated further.

use std::time::Duration;

use axum::http::StatusCode;

use crate::config::validation::ValidationError;

/// Error type for configuration loading and route table construction.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Per-request failure.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// First path segment does not name any configured route.
    #[error("Route not found. Please check your URL and try again.")]
    RouteNotFound,

    /// Connect, DNS or protocol failure talking to the upstream.
    #[error("Service unavailable: {route}")]
    UpstreamUnavailable {
        route: String,
        #[source]
        source: hyper_util::client::legacy::Error,
    },

    /// Upstream did not produce response headers in time.
    #[error("Service unavailable: {route}")]
    UpstreamTimeout { route: String, timeout: Duration },

    /// Anything else that went wrong while handling the request.
    #[error("{message}")]
    HandlerFault {
        message: String,
        detail: Option<String>,
    },
}

impl GatewayError {
    /// Generic message used for handler faults outside diagnostics mode.
    pub const INTERNAL_MESSAGE: &'static str = "Internal server error";

    /// HTTP status the envelope is sent with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::RouteNotFound => StatusCode::NOT_FOUND,
            GatewayError::UpstreamUnavailable { .. } | GatewayError::UpstreamTimeout { .. } => {
                StatusCode::BAD_GATEWAY
            }
            GatewayError::HandlerFault { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Wrap an unexpected error. With `diagnostics` off the message is generic
    /// and no detail is exposed to the client.
    pub fn handler_fault(err: &(dyn std::error::Error + 'static), diagnostics: bool) -> Self {
        if !diagnostics {
            return GatewayError::HandlerFault {
                message: Self::INTERNAL_MESSAGE.to_string(),
                detail: None,
            };
        }

        let mut chain = vec![format!("{:?}", err)];
        let mut source = err.source();
        while let Some(cause) = source {
            chain.push(format!("caused by: {}", cause));
            source = cause.source();
        }

        GatewayError::HandlerFault {
            message: err.to_string(),
            detail: Some(chain.join("\n")),
        }
    }

    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::RouteNotFound => "not_found",
            GatewayError::UpstreamUnavailable { .. } => "unavailable",
            GatewayError::UpstreamTimeout { .. } => "timeout",
            GatewayError::HandlerFault { .. } => "handler",
        }
    }
}
