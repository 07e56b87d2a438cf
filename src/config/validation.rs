//! Configuration validation and route resolution.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Resolve route templates against service addresses into a `RouteTable`
//! - Validate value ranges (timeouts > 0)
//! - Detect conflicting routes
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Runs before the listener is bound; any error is fatal

use axum::http::{HeaderMap, HeaderName, HeaderValue, Uri};
use url::Url;

use crate::config::catalog::builtin_routes;
use crate::config::schema::{GatewayConfig, RouteConfig, API_KEY_HEADER};
use crate::error::ConfigError;
use crate::routing::{rewrite::target_path, RouteDefinition, RouteTable};

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("route prefix is empty")]
    EmptyPrefix,

    #[error("route prefix {0:?} must be a single '/segment'")]
    InvalidPrefix(String),

    #[error("route prefix {0:?} is defined more than once")]
    DuplicatePrefix(String),

    #[error("route {route:?} needs service {service:?} but SERVICE_NAME_{service} is not set")]
    MissingService { route: String, service: String },

    #[error("route {route:?} needs service {service:?} but SERVICE_NAME_{service} is empty")]
    EmptyService { route: String, service: String },

    #[error("route {route:?} has invalid target {target:?}: {reason}")]
    InvalidTarget {
        route: String,
        target: String,
        reason: String,
    },

    #[error("route {route:?} has invalid static header {header:?}")]
    InvalidHeader { route: String, header: String },

    #[error("environment variable {name} has invalid value {value:?}")]
    InvalidVariable { name: String, value: String },

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),
}

/// Check non-route settings.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.timeouts.upstream_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("upstream timeout"));
    }
    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("connect timeout"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Resolve the configured routes (or the built-in catalog) into the
/// immutable route table.
pub fn resolve_routes(config: &GatewayConfig) -> Result<RouteTable, ConfigError> {
    let templates = if config.routes.is_empty() {
        builtin_routes()
    } else {
        config.routes.clone()
    };

    let mut errors = Vec::new();
    let mut definitions = Vec::with_capacity(templates.len());

    for template in &templates {
        match resolve_route(config, template) {
            Ok(definition) => definitions.push(definition),
            Err(mut route_errors) => errors.append(&mut route_errors),
        }
    }

    let table = match RouteTable::new(definitions) {
        Ok(table) => Some(table),
        Err(mut duplicates) => {
            errors.append(&mut duplicates);
            None
        }
    };

    match table {
        Some(table) if errors.is_empty() => Ok(table),
        _ => Err(ConfigError::Validation(errors)),
    }
}

fn resolve_route(
    config: &GatewayConfig,
    template: &RouteConfig,
) -> Result<RouteDefinition, Vec<ValidationError>> {
    let mut errors = Vec::new();
    let prefix = template.route.as_str();

    if prefix.is_empty() || prefix == "/" {
        errors.push(ValidationError::EmptyPrefix);
    } else if !prefix.starts_with('/') || prefix[1..].contains('/') {
        errors.push(ValidationError::InvalidPrefix(prefix.to_string()));
    }

    let target = match config.services.get(&template.service) {
        None => {
            errors.push(ValidationError::MissingService {
                route: prefix.to_string(),
                service: template.service.clone(),
            });
            None
        }
        Some(base) if base.trim().is_empty() => {
            errors.push(ValidationError::EmptyService {
                route: prefix.to_string(),
                service: template.service.clone(),
            });
            None
        }
        Some(base) => {
            let target = format!("{}{}", base.trim().trim_end_matches('/'), template.path);
            match check_target(&target) {
                Ok(upstream) => Some((target, upstream)),
                Err(reason) => {
                    errors.push(ValidationError::InvalidTarget {
                        route: prefix.to_string(),
                        target,
                        reason,
                    });
                    None
                }
            }
        }
    };

    let mut headers = HeaderMap::new();
    for (name, value) in &template.headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => errors.push(ValidationError::InvalidHeader {
                route: prefix.to_string(),
                header: name.clone(),
            }),
        }
    }
    if template.api_key && !headers.contains_key(API_KEY_HEADER) {
        match HeaderValue::from_str(&config.api_key) {
            Ok(value) if !config.api_key.is_empty() => {
                headers.insert(HeaderName::from_static(API_KEY_HEADER), value);
            }
            _ => errors.push(ValidationError::InvalidHeader {
                route: prefix.to_string(),
                header: API_KEY_HEADER.to_string(),
            }),
        }
    }

    match target {
        Some((target, upstream)) if errors.is_empty() => Ok(RouteDefinition::new(
            prefix,
            target,
            upstream,
            headers,
            template.description.clone(),
        )),
        _ => Err(errors),
    }
}

/// Returns the absolute upstream URI (origin plus the target's path) when the
/// target is usable.
fn check_target(target: &str) -> Result<Uri, String> {
    let url = Url::parse(target).map_err(|e| e.to_string())?;

    if url.scheme() != "http" {
        return Err(format!("unsupported scheme {:?}", url.scheme()));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err("missing host".to_string());
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err("query and fragment are not allowed".to_string());
    }
    if !target.starts_with("http://") {
        return Err("expected scheme://host[:port]/path".to_string());
    }

    // `Url` percent-encodes characters `Uri` rejects; the forwarded form
    // must parse as a `Uri`.
    format!("{}{}", url.origin().ascii_serialization(), target_path(target))
        .parse::<Uri>()
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::catalog::builtin_services;

    fn config_with_all_services() -> GatewayConfig {
        let mut config = GatewayConfig::default();
        for (i, key) in builtin_services().iter().enumerate() {
            config
                .services
                .insert(key.to_string(), format!("http://svc{}:{}", i, 4000 + i));
        }
        config
    }

    fn errors_of(result: Result<RouteTable, ConfigError>) -> Vec<ValidationError> {
        match result {
            Err(ConfigError::Validation(errors)) => errors,
            Err(other) => panic!("unexpected error {:?}", other),
            Ok(_) => panic!("expected validation failure"),
        }
    }

    #[test]
    fn builtin_catalog_resolves() {
        let table = resolve_routes(&config_with_all_services()).unwrap();
        assert_eq!(table.len(), 14);

        let login = table.lookup("/login").unwrap();
        assert_eq!(login.target(), "http://svc1:4001/api/v1/auth");
        assert_eq!(login.static_headers()[API_KEY_HEADER], "apikey");

        assert_eq!(login.upstream(), "http://svc1:4001/api/v1/auth");

        let checkout = table.lookup("/checkout").unwrap();
        assert_eq!(checkout.target(), "http://svc3:4003");
        assert_eq!(checkout.upstream(), "http://svc3:4003/");
    }

    #[test]
    fn trailing_slash_on_service_address_is_trimmed() {
        let mut config = config_with_all_services();
        config.services.insert("AUTH".into(), "http://auth:4000/".into());
        let table = resolve_routes(&config).unwrap();
        assert_eq!(table.lookup("/login").unwrap().target(), "http://auth:4000/api/v1/auth");
    }

    #[test]
    fn missing_and_empty_services_are_all_reported() {
        let mut config = GatewayConfig::default();
        config.services.insert("AUTH".into(), "".into());

        let errors = errors_of(resolve_routes(&config));
        assert!(errors.contains(&ValidationError::EmptyService {
            route: "/login".into(),
            service: "AUTH".into(),
        }));
        assert!(errors.contains(&ValidationError::MissingService {
            route: "/cap".into(),
            service: "STORAGE".into(),
        }));
        assert_eq!(errors.len(), 14);
    }

    #[test]
    fn rejects_bad_targets() {
        for base in ["auth:4000", "https://auth", "http://auth:4000?x=1", "not a url"] {
            let mut config = GatewayConfig::default();
            config.services.insert("AUTH".into(), base.into());
            config.routes = vec![RouteConfig::new("/login", "AUTH", "/api", "Login")];

            let errors = errors_of(resolve_routes(&config));
            assert!(
                matches!(errors.as_slice(), [ValidationError::InvalidTarget { .. }]),
                "{} -> {:?}",
                base,
                errors
            );
        }
    }

    #[test]
    fn target_that_is_not_a_valid_request_uri_fails_at_startup() {
        let mut config = GatewayConfig::default();
        config.services.insert("AUTH".into(), "http://auth:4000".into());
        config.routes = vec![RouteConfig::new("/login", "AUTH", "/api v1/auth", "Login")];

        match errors_of(resolve_routes(&config)).as_slice() {
            [ValidationError::InvalidTarget { route, target, .. }] => {
                assert_eq!(route, "/login");
                assert_eq!(target, "http://auth:4000/api v1/auth");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn rejects_bad_prefixes_and_duplicates() {
        let mut config = GatewayConfig::default();
        config.services.insert("AUTH".into(), "http://auth:4000".into());
        config.routes = vec![
            RouteConfig::new("/login", "AUTH", "/a", "a"),
            RouteConfig::new("/login", "AUTH", "/b", "b"),
            RouteConfig::new("/api/v1", "AUTH", "/c", "c"),
            RouteConfig::new("/", "AUTH", "/d", "d"),
        ];

        let errors = errors_of(resolve_routes(&config));
        assert!(errors.contains(&ValidationError::DuplicatePrefix("/login".into())));
        assert!(errors.contains(&ValidationError::InvalidPrefix("/api/v1".into())));
        assert!(errors.contains(&ValidationError::EmptyPrefix));
    }

    #[test]
    fn explicit_api_key_header_wins_over_global_key() {
        let mut config = GatewayConfig::default();
        config.services.insert("AUTH".into(), "http://auth:4000".into());
        let mut route = RouteConfig::new("/login", "AUTH", "/api", "Login");
        route.headers.insert("X-Api-Key".into(), "route-key".into());
        route.headers.insert("x-tenant".into(), "lms".into());
        config.routes = vec![route];

        let table = resolve_routes(&config).unwrap();
        let headers = table.lookup("/login").unwrap().static_headers();
        assert_eq!(headers[API_KEY_HEADER], "route-key");
        assert_eq!(headers["x-tenant"], "lms");
        assert_eq!(headers.len(), 2);
    }

    #[test]
    fn invalid_header_is_reported() {
        let mut config = GatewayConfig::default();
        config.services.insert("AUTH".into(), "http://auth:4000".into());
        let mut route = RouteConfig::new("/login", "AUTH", "/api", "Login");
        route.headers.insert("bad header".into(), "v".into());
        config.routes = vec![route];

        let errors = errors_of(resolve_routes(&config));
        assert_eq!(
            errors,
            vec![ValidationError::InvalidHeader {
                route: "/login".into(),
                header: "bad header".into(),
            }]
        );
    }

    #[test]
    fn zero_timeouts_are_rejected() {
        let mut config = GatewayConfig::default();
        config.timeouts.upstream_secs = 0;
        assert_eq!(
            validate_config(&config).unwrap_err(),
            vec![ValidationError::ZeroTimeout("upstream timeout")]
        );
    }
}
