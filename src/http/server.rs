//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the proxy handler
//! - Wire up middleware (panic boundary, request ID, tracing, CORS, security
//!   headers, route resolution)
//! - Dispatch requests to the forwarder
//! - Serve until the shutdown signal, draining in-flight responses

use std::io;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    Extension,
    http::Request,
    middleware,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::{Environment, GatewayConfig};
use crate::error::GatewayError;
use crate::http::cors::cors_layer;
use crate::http::forward::Forwarder;
use crate::http::request::{route_context, RequestContext};
use crate::http::response::PanicEnvelope;
use crate::observability::metrics;
use crate::routing::RouteTable;
use crate::security::headers::with_security_headers;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub forwarder: Forwarder,
    pub environment: Environment,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: Arc<GatewayConfig>,
    routes: Arc<RouteTable>,
}

impl HttpServer {
    /// Create a server over an already resolved route table.
    pub fn new(config: GatewayConfig, routes: RouteTable) -> Self {
        let routes = Arc::new(routes);
        let state = AppState {
            forwarder: Forwarder::new(&config.timeouts),
            environment: config.environment,
        };

        let router = Self::build_router(&config, routes.clone(), state);
        Self {
            router,
            config: Arc::new(config),
            routes,
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, routes: Arc<RouteTable>, state: AppState) -> Router {
        let router = Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .fallback(proxy_handler)
            .with_state(state)
            .layer(middleware::from_fn_with_state(routes, route_context));

        with_gateway_layers(router, config)
    }

    /// Run the server until `shutdown` fires, then let in-flight requests
    /// finish.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, routes = self.routes.len(), "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Stopped accepting connections, draining in-flight requests");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// The fully layered router, for driving the gateway without a socket.
    pub fn into_router(self) -> Router {
        self.router
    }
}

/// Outer middleware shared by every gateway route: panic boundary, request
/// id, tracing, CORS and security headers.
fn with_gateway_layers(router: Router, config: &GatewayConfig) -> Router {
    let diagnostics = config.environment.diagnostics();

    with_security_headers(router)
        .layer(cors_layer(config.environment, &config.cors))
        .layer(
            ServiceBuilder::new()
                .layer(CatchPanicLayer::custom(PanicEnvelope::new(diagnostics)))
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
}

/// Main proxy handler.
/// Takes the resolved context, forwards, and maps failures to envelopes.
async fn proxy_handler(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    request: Request<Body>,
) -> Response {
    let start = Instant::now();
    let method = context.method.to_string();

    let Some(route) = context.route.clone() else {
        tracing::debug!(method = %method, path = %context.path, "No route matched");
        metrics::record_request(metrics::UNMATCHED, &method, 404, start);
        return GatewayError::RouteNotFound.into_response();
    };

    let uri = match context.upstream_uri(&route) {
        Ok(uri) => uri,
        Err(e) => {
            tracing::error!(route = %route.prefix(), error = %e, "Failed to build upstream URI");
            metrics::record_request(route.prefix(), &method, 500, start);
            return GatewayError::handler_fault(&e, state.environment.diagnostics()).into_response();
        }
    };

    tracing::debug!(
        method = %method,
        path = %context.path,
        route = %route.prefix(),
        upstream = %uri,
        "Proxying request"
    );

    let body = request.into_body();
    match state
        .forwarder
        .forward(&route, context.method, uri, context.outbound_headers, body)
        .await
    {
        Ok(response) => {
            let status = response.status();
            tracing::debug!(route = %route.prefix(), status = %status, "Upstream responded");
            metrics::record_request(route.prefix(), &method, status.as_u16(), start);
            response
        }
        Err(err) => {
            tracing::error!(
                route = %route.prefix(),
                description = %route.label(),
                error = %err,
                cause = ?std::error::Error::source(&err),
                "Upstream request failed"
            );
            metrics::record_upstream_failure(route.prefix(), err.kind());
            metrics::record_request(route.prefix(), &method, err.status_code().as_u16(), start);
            err.into_response()
        }
    }
}
