//! LMS API Gateway Library

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod security;

pub use config::GatewayConfig;
pub use error::{ConfigError, GatewayError};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{RouteDefinition, RouteTable};
