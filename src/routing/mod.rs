//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path)
//!     → table.rs (first-segment lookup)
//!     → Return: matched RouteDefinition or NoMatch
//!     → rewrite.rs (upstream path from the route's target)
//!
//! Route Compilation (at startup):
//!     RouteConfig[] + SERVICE_NAME_*
//!     → config::validation resolves targets and headers
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (single hash lookup)
//! - Deterministic: same input always matches same route

pub mod rewrite;
pub mod table;

pub use rewrite::rewrite;
pub use table::{first_segment, RouteDefinition, RouteTable};
