//! Upstream forwarding.
//!
//! # Responsibilities
//! - Issue the outbound request with the prepared method, URI and headers
//! - Stream the request body up and the response body back
//! - Bound the wait for response headers with the upstream timeout
//! - Translate transport failures into `GatewayError`
//!
//! # Design Decisions
//! - One attempt per request, no retry
//! - Upstream status is passed through unchanged, including 5xx
//! - Bodies are never buffered in full

use std::time::Duration;

use axum::{
    body::Body,
    http::{HeaderMap, HeaderName, Method, Request, Response, Uri},
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::config::TimeoutConfig;
use crate::error::GatewayError;
use crate::http::request::strip_hop_by_hop;
use crate::routing::RouteDefinition;

const X_POWERED_BY: HeaderName = HeaderName::from_static("x-powered-by");

/// Pooled HTTP client shared by all requests.
#[derive(Clone)]
pub struct Forwarder {
    client: Client<HttpConnector, Body>,
    timeout: Duration,
}

impl Forwarder {
    pub fn new(timeouts: &TimeoutConfig) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(timeouts.connect_secs)));
        connector.set_nodelay(true);

        let client = Client::builder(TokioExecutor::new()).build(connector);

        Self {
            client,
            timeout: Duration::from_secs(timeouts.upstream_secs),
        }
    }

    /// Send one request upstream for `route`.
    pub async fn forward(
        &self,
        route: &RouteDefinition,
        method: Method,
        uri: Uri,
        headers: HeaderMap,
        body: Body,
    ) -> Result<Response<Body>, GatewayError> {
        let mut request = Request::new(body);
        *request.method_mut() = method;
        *request.uri_mut() = uri;
        *request.headers_mut() = headers;

        let response = match tokio::time::timeout(self.timeout, self.client.request(request)).await
        {
            Ok(Ok(response)) => response,
            Ok(Err(source)) => {
                return Err(GatewayError::UpstreamUnavailable {
                    route: route.label().to_string(),
                    source,
                })
            }
            Err(_) => {
                return Err(GatewayError::UpstreamTimeout {
                    route: route.label().to_string(),
                    timeout: self.timeout,
                })
            }
        };

        let (mut parts, body) = response.into_parts();
        strip_hop_by_hop(&mut parts.headers);
        parts.headers.remove(X_POWERED_BY);

        Ok(Response::from_parts(parts, Body::new(body)))
    }
}
