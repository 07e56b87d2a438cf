//! Environment variable overlay.
//!
//! Takes the variables as an iterator so callers decide where they come from
//! (`std::env::vars()` in the binary, literal pairs in tests).

use std::net::SocketAddr;

use crate::config::schema::{Environment, GatewayConfig};
use crate::config::validation::ValidationError;
use crate::error::ConfigError;

pub const PORT: &str = "PORT";
pub const HOST: &str = "HOST";
pub const NODE_ENV: &str = "NODE_ENV";
pub const ALLOWED_ORIGINS: &str = "ALLOWED_ORIGINS";
pub const API_KEY: &str = "GATEWAY_API_KEY";
pub const UPSTREAM_TIMEOUT_SECS: &str = "UPSTREAM_TIMEOUT_SECS";
pub const UPSTREAM_CONNECT_TIMEOUT_SECS: &str = "UPSTREAM_CONNECT_TIMEOUT_SECS";
pub const METRICS_ADDRESS: &str = "METRICS_ADDRESS";

/// Prefix of the per-service address variables, e.g. `SERVICE_NAME_AUTH`.
pub const SERVICE_PREFIX: &str = "SERVICE_NAME_";

/// Apply recognized variables on top of `config`. Unknown variables are
/// ignored; malformed numeric values are reported together.
pub fn apply_env<I, K, V>(config: &mut GatewayConfig, vars: I) -> Result<(), ConfigError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut errors = Vec::new();

    for (key, value) in vars {
        let (key, value) = (key.as_ref(), value.as_ref());

        if let Some(service) = key.strip_prefix(SERVICE_PREFIX) {
            if !service.is_empty() {
                config.services.insert(service.to_string(), value.trim().to_string());
            }
            continue;
        }

        match key {
            PORT => match value.trim().parse::<u16>() {
                Ok(port) => config.listener.port = port,
                Err(_) => errors.push(invalid(key, value)),
            },
            HOST => config.listener.host = value.trim().to_string(),
            NODE_ENV => config.environment = Environment::from_node_env(value),
            ALLOWED_ORIGINS => config.cors.allowed_origins = split_list(value),
            API_KEY => config.api_key = value.to_string(),
            UPSTREAM_TIMEOUT_SECS => match value.trim().parse::<u64>() {
                Ok(secs) => config.timeouts.upstream_secs = secs,
                Err(_) => errors.push(invalid(key, value)),
            },
            UPSTREAM_CONNECT_TIMEOUT_SECS => match value.trim().parse::<u64>() {
                Ok(secs) => config.timeouts.connect_secs = secs,
                Err(_) => errors.push(invalid(key, value)),
            },
            METRICS_ADDRESS => match value.trim() {
                "" => config.observability.metrics_address = None,
                address => match address.parse::<SocketAddr>() {
                    Ok(addr) => config.observability.metrics_address = Some(addr),
                    Err(_) => errors.push(invalid(key, value)),
                },
            },
            _ => {}
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Validation(errors))
    }
}

fn invalid(key: &str, value: &str) -> ValidationError {
    ValidationError::InvalidVariable {
        name: key.to_string(),
        value: value.to_string(),
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
