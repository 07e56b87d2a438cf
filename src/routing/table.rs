//! Route lookup.
//!
//! # Responsibilities
//! - Store resolved route definitions in registration order
//! - Look up the owning route for a request path
//! - Return matched route or explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(1) lookup via HashMap keyed by the bare segment
//! - Exact match on the first path segment only. `/login/extra` belongs to
//!   `/login`; there is no wildcard, regex or longest-prefix matching
//! - Case-sensitive, no percent-decoding

use std::collections::HashMap;
use std::sync::Arc;

use axum::http::{HeaderMap, Uri};

use crate::config::ValidationError;

/// A single resolved route.
#[derive(Debug, Clone)]
pub struct RouteDefinition {
    prefix: String,
    target: String,
    upstream: Uri,
    static_headers: HeaderMap,
    description: Option<String>,
}

impl RouteDefinition {
    /// `upstream` is the absolute URI requests are forwarded to, already
    /// checked at startup.
    pub fn new(
        prefix: impl Into<String>,
        target: impl Into<String>,
        upstream: Uri,
        static_headers: HeaderMap,
        description: Option<String>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            target: target.into(),
            upstream,
            static_headers,
            description,
        }
    }

    /// Inbound prefix including the leading slash, e.g. `/login`.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Prefix without its leading slash; the lookup key.
    pub fn segment(&self) -> &str {
        self.prefix.strip_prefix('/').unwrap_or(&self.prefix)
    }

    /// Fully resolved upstream base URL.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Upstream URI without a query.
    pub fn upstream(&self) -> &Uri {
        &self.upstream
    }

    pub fn static_headers(&self) -> &HeaderMap {
        &self.static_headers
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Description when present, otherwise the prefix.
    pub fn label(&self) -> &str {
        self.description.as_deref().unwrap_or(&self.prefix)
    }
}

/// The immutable route table.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: Vec<Arc<RouteDefinition>>,
    by_segment: HashMap<String, usize>,
}

impl RouteTable {
    /// Build the table. Fails with every prefix that appears more than once.
    pub fn new(definitions: Vec<RouteDefinition>) -> Result<Self, Vec<ValidationError>> {
        let mut routes = Vec::with_capacity(definitions.len());
        let mut by_segment = HashMap::with_capacity(definitions.len());
        let mut duplicates: Vec<ValidationError> = Vec::new();

        for definition in definitions {
            let key = definition.segment().to_string();
            if by_segment.contains_key(&key) {
                let dup = ValidationError::DuplicatePrefix(definition.prefix().to_string());
                if !duplicates.contains(&dup) {
                    duplicates.push(dup);
                }
                continue;
            }
            by_segment.insert(key, routes.len());
            routes.push(Arc::new(definition));
        }

        if duplicates.is_empty() {
            Ok(Self { routes, by_segment })
        } else {
            Err(duplicates)
        }
    }

    /// Find the route owning `path`.
    pub fn lookup(&self, path: &str) -> Option<&Arc<RouteDefinition>> {
        self.by_segment
            .get(first_segment(path))
            .map(|&index| &self.routes[index])
    }

    /// Routes in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<RouteDefinition>> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// `/<segment>/...` → `<segment>`. Anything without a leading slash has no
/// first segment.
pub fn first_segment(path: &str) -> &str {
    match path.strip_prefix('/') {
        Some(rest) => rest.split('/').next().unwrap_or(""),
        None => "",
    }
}
