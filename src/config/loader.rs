//! Configuration loading.

use std::fs;
use std::path::Path;

use crate::config::env::apply_env;
use crate::config::schema::GatewayConfig;
use crate::config::validation::validate_config;
use crate::error::ConfigError;

/// Parse a TOML configuration file.
pub fn load_file(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: GatewayConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Build the effective configuration: optional file, then environment
/// variables on top, then validation.
pub fn load_config<I, K, V>(path: Option<&Path>, vars: I) -> Result<GatewayConfig, ConfigError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut config = match path {
        Some(path) => load_file(path)?,
        None => GatewayConfig::default(),
    };

    apply_env(&mut config, vars)?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// `load_config` against the process environment.
pub fn load_from_env(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    load_config(path, std::env::vars())
}
