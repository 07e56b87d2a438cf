//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → env.rs (PORT, NODE_ENV, ALLOWED_ORIGINS, SERVICE_NAME_*, ...)
//!     → validation.rs (semantic checks, route resolution)
//!     → GatewayConfig + RouteTable (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup and never reloaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod catalog;
pub mod env;
pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_from_env};
pub use schema::{
    CorsConfig, Environment, GatewayConfig, ListenerConfig, ObservabilityConfig, RouteConfig,
    TimeoutConfig, API_KEY_HEADER,
};
pub use validation::{resolve_routes, ValidationError};
