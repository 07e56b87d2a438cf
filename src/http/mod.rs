//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (route lookup, outbound headers, upstream URI)
//!     → forward.rs (single upstream call, streamed bodies)
//!     → response.rs (error envelope when anything fails)
//!     → Send to client
//! ```

pub mod cors;
pub mod forward;
pub mod request;
pub mod response;
pub mod server;

pub use forward::Forwarder;
pub use request::{inject_static_headers, RequestContext};
pub use response::Envelope;
pub use server::{AppState, HttpServer};
