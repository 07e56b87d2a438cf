//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits so an optional TOML file can provide any of
//! them; environment variables are layered on top by `env.rs`.

use std::collections::BTreeMap;
use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

/// Header used to carry the internal service-to-service API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (host, port).
    pub listener: ListenerConfig,

    /// Deployment mode, from `NODE_ENV`.
    pub environment: Environment,

    /// CORS settings.
    pub cors: CorsConfig,

    /// Upstream timeouts.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Internal API key attached to routes with `api_key = true`.
    pub api_key: String,

    /// Downstream service base addresses keyed by service name
    /// (`AUTH`, `COURSE`, ...), normally from `SERVICE_NAME_*`.
    pub services: BTreeMap<String, String>,

    /// Route templates. Empty means "use the built-in catalog".
    pub routes: Vec<RouteConfig>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            environment: Environment::default(),
            cors: CorsConfig::default(),
            timeouts: TimeoutConfig::default(),
            observability: ObservabilityConfig::default(),
            api_key: "apikey".to_string(),
            services: BTreeMap::new(),
            routes: Vec::new(),
        }
    }
}

/// Deployment mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Interpret a `NODE_ENV` value. Only `production` selects production.
    pub fn from_node_env(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("production") {
            Environment::Production
        } else {
            Environment::Development
        }
    }

    pub fn is_production(self) -> bool {
        self == Environment::Production
    }

    /// Verbose diagnostics (route listing, error detail) are on outside production.
    pub fn diagnostics(self) -> bool {
        !self.is_production()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind.
    pub host: String,

    /// Listening port.
    pub port: u16,
}

impl ListenerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5001,
        }
    }
}

/// Cross-origin settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Allowed origins in production mode. Ignored in development.
    pub allowed_origins: Vec<String>,
}

/// Timeout configuration for upstream calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Time allowed for the upstream to produce response headers, in seconds.
    pub upstream_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            upstream_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Prometheus exporter bind address. Metrics export is off when unset.
    pub metrics_address: Option<SocketAddr>,
}

/// A route template. Resolved into a `RouteDefinition` at startup.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Inbound prefix, a single segment such as `/login`.
    pub route: String,

    /// Key into `GatewayConfig::services`.
    pub service: String,

    /// Suffix appended to the service address.
    #[serde(default)]
    pub path: String,

    /// Static headers injected into every forwarded request.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    /// Attach `x-api-key: <api_key>` unless `headers` already sets it.
    #[serde(default = "default_api_key")]
    pub api_key: bool,

    /// Label for logs and error messages.
    #[serde(default)]
    pub description: Option<String>,
}

fn default_api_key() -> bool {
    true
}

impl RouteConfig {
    pub fn new(route: &str, service: &str, path: &str, description: &str) -> Self {
        Self {
            route: route.to_string(),
            service: service.to_string(),
            path: path.to_string(),
            headers: BTreeMap::new(),
            api_key: true,
            description: Some(description.to_string()),
        }
    }
}
