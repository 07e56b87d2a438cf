//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Every response:
//!     → headers.rs (nosniff, frame options, referrer policy, ...)
//! Every forwarded request:
//!     → http::request injects the route's API key, replacing client values
//! ```
//!
//! # Design Decisions
//! - The gateway is the only party allowed to assert the internal API key
//! - No trust in client-supplied credentials headers

pub mod headers;
