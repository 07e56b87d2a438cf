//! Gateway-originated responses.
//!
//! # Responsibilities
//! - Define the JSON error envelope shared by every error path
//! - Map `GatewayError` to a status code and envelope
//! - Turn handler panics into a 500 envelope
//!
//! # Design Decisions
//! - One shape for 404, 502 and 500 so clients handle them uniformly
//! - `stack` is only serialized when diagnostics mode produced one

use std::any::Any;

use axum::{
    body::Body,
    http::{header, HeaderValue, Response as HttpResponse, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tower_http::catch_panic::ResponseForPanic;

use crate::error::GatewayError;

/// Uniform error body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub code: u16,
    pub status: String,
    pub message: String,
    pub data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl Envelope {
    pub fn error(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code: status.as_u16(),
            status: "Error".to_string(),
            message: message.into(),
            data: None,
            stack: None,
        }
    }

    pub fn with_stack(mut self, stack: Option<String>) -> Self {
        self.stack = stack;
        self
    }

    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}

impl From<&GatewayError> for Envelope {
    fn from(err: &GatewayError) -> Self {
        let envelope = Envelope::error(err.status_code(), err.to_string());
        match err {
            GatewayError::HandlerFault { detail, .. } => envelope.with_stack(detail.clone()),
            _ => envelope,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        Envelope::from(&self).into_response()
    }
}

/// `CatchPanicLayer` hook producing the 500 envelope.
#[derive(Debug, Clone, Copy)]
pub struct PanicEnvelope {
    diagnostics: bool,
}

impl PanicEnvelope {
    pub fn new(diagnostics: bool) -> Self {
        Self { diagnostics }
    }
}

impl ResponseForPanic for PanicEnvelope {
    type ResponseBody = Body;

    fn response_for_panic(&mut self, err: Box<dyn Any + Send + 'static>) -> HttpResponse<Body> {
        let detail = if let Some(s) = err.downcast_ref::<String>() {
            s.clone()
        } else if let Some(s) = err.downcast_ref::<&str>() {
            s.to_string()
        } else {
            "unknown panic payload".to_string()
        };

        tracing::error!(panic = %detail, "Request handler panicked");
        crate::observability::metrics::record_handler_fault();

        let envelope = if self.diagnostics {
            Envelope::error(StatusCode::INTERNAL_SERVER_ERROR, detail.clone()).with_stack(Some(detail))
        } else {
            Envelope::error(StatusCode::INTERNAL_SERVER_ERROR, GatewayError::INTERNAL_MESSAGE)
        };

        let body = serde_json::to_vec(&envelope).unwrap_or_default();
        let mut response = HttpResponse::new(Body::from(body));
        *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        response
    }
}
