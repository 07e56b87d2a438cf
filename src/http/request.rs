//! Inbound request handling: route resolution and header injection.
//!
//! # Responsibilities
//! - Find the owning route for every inbound request
//! - Build the outbound header set (hop-by-hop stripped, `Host` rewritten,
//!   static route headers injected)
//! - Compute the upstream URI
//!
//! # Design Decisions
//! - The inbound request's headers are never modified; the outbound copy
//!   lives in `RequestContext`, attached as a request extension
//! - Injected headers replace every client value of the same name

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{
        header::{self, HeaderName},
        uri::InvalidUri,
        HeaderMap, HeaderValue, Method, Request, Uri,
    },
    middleware::Next,
    response::Response,
};

use crate::routing::{rewrite, RouteDefinition, RouteTable};

/// Headers that only apply to a single transport hop.
pub const HOP_BY_HOP: [HeaderName; 8] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

/// Per-request state built before forwarding.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub route: Option<Arc<RouteDefinition>>,
    pub upstream_path: Option<String>,
    pub outbound_headers: HeaderMap,
}

impl RequestContext {
    /// Resolve the route for a request and prepare its outbound headers.
    pub fn resolve(table: &RouteTable, method: &Method, uri: &Uri, headers: &HeaderMap) -> Self {
        let path = uri.path().to_string();
        let route = table.lookup(&path).cloned();

        let mut outbound_headers = headers.clone();
        let upstream_path = route.as_ref().map(|route| {
            strip_hop_by_hop(&mut outbound_headers);
            set_host(&mut outbound_headers, route);
            inject_static_headers(&mut outbound_headers, route);
            rewrite(&path, route)
        });

        Self {
            method: method.clone(),
            path,
            query: uri.query().map(str::to_string),
            route,
            upstream_path,
            outbound_headers,
        }
    }

    /// Absolute upstream URI for the matched `route`: its resolved upstream
    /// plus the inbound query.
    pub fn upstream_uri(&self, route: &RouteDefinition) -> Result<Uri, InvalidUri> {
        match &self.query {
            Some(query) => format!("{}?{}", route.upstream(), query).parse(),
            None => Ok(route.upstream().clone()),
        }
    }
}

/// Merge the route's static headers into `headers`, replacing any existing
/// values under the same names.
pub fn inject_static_headers(headers: &mut HeaderMap, route: &RouteDefinition) {
    for (name, value) in route.static_headers() {
        headers.insert(name.clone(), value.clone());
    }
}

/// Remove hop-by-hop headers, including any listed in `Connection`.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let listed: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in listed.iter().chain(HOP_BY_HOP.iter()) {
        headers.remove(name);
    }
}

fn set_host(headers: &mut HeaderMap, route: &RouteDefinition) {
    let Some(authority) = route.upstream().authority() else {
        return;
    };
    if let Ok(value) = HeaderValue::from_str(authority.as_str()) {
        headers.insert(header::HOST, value);
    }
}

/// Middleware: resolve the route and attach the `RequestContext`.
pub async fn route_context(
    State(routes): State<Arc<RouteTable>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let context = RequestContext::resolve(
        &routes,
        request.method(),
        request.uri(),
        request.headers(),
    );

    if let Some(route) = &context.route {
        tracing::trace!(
            path = %context.path,
            route = %route.prefix(),
            upstream_path = ?context.upstream_path,
            injected = route.static_headers().len(),
            "Route resolved"
        );
    }

    request.extensions_mut().insert(context);
    next.run(request).await
}
