//! Startup orchestration.
//!
//! # Responsibilities
//! - Resolve the route table from validated configuration
//! - Build the HTTP server
//! - Bind the listener last, once everything else is ready
//! - Announce the gateway and, outside production, its routes
//!
//! # Design Decisions
//! - Fail fast: any configuration error is fatal before binding

use std::net::SocketAddr;

use tokio::net::TcpListener;

use crate::config::{resolve_routes, GatewayConfig};
use crate::error::ConfigError;
use crate::http::HttpServer;
use crate::routing::RouteTable;

/// Resolve routes and construct the server. Nothing is bound yet.
pub fn build(config: GatewayConfig) -> Result<HttpServer, ConfigError> {
    let routes = resolve_routes(&config)?;
    Ok(HttpServer::new(config, routes))
}

pub async fn bind(config: &GatewayConfig) -> std::io::Result<TcpListener> {
    TcpListener::bind(config.listener.bind_address()).await
}

/// One line per route: `prefix → target (description)`.
pub fn describe_routes(routes: &RouteTable) -> Vec<String> {
    routes
        .iter()
        .map(|route| {
            format!(
                "{} → {} ({})",
                route.prefix(),
                route.target(),
                route.description().unwrap_or("No description")
            )
        })
        .collect()
}

pub fn announce(config: &GatewayConfig, routes: &RouteTable, addr: SocketAddr) {
    tracing::info!(
        address = %addr,
        port = addr.port(),
        environment = config.environment.as_str(),
        upstream_timeout_secs = config.timeouts.upstream_secs,
        routes = routes.len(),
        "API gateway is running"
    );

    if config.environment.diagnostics() {
        for route in routes.iter() {
            tracing::info!(
                route = %route.prefix(),
                target = %route.target(),
                description = route.description().unwrap_or("No description"),
                "Available route"
            );
        }
    }
}
