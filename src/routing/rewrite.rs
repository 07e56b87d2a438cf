//! Upstream path computation.
//!
//! The upstream path is the path portion of the route's target URL: split on
//! `/`, drop `scheme:`, the empty piece and the host, join the rest. It
//! replaces the inbound path entirely, so `/lecget/42` forwards to the same
//! upstream path as `/lecget`. Pure string work: no slash normalization, no
//! percent-decoding.

use crate::routing::RouteDefinition;

/// Compute the upstream path for a request matched to `route`.
///
/// `inbound_path` does not influence the result; anything after the matched
/// segment is dropped.
pub fn rewrite(_inbound_path: &str, route: &RouteDefinition) -> String {
    target_path(route.target())
}

/// Path portion of a `scheme://host[:port]/path` string, always starting
/// with `/`.
pub fn target_path(target: &str) -> String {
    let rest: Vec<&str> = target.split('/').skip(3).collect();
    format!("/{}", rest.join("/"))
}
