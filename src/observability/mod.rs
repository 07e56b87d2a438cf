//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//! Per request:
//!     → x-request-id generated or accepted, forwarded upstream, echoed back
//!     → tower-http TraceLayer access log span
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing in production
//! - Request ID flows through all subsystems
//! - Metrics are cheap and optional

pub mod logging;
pub mod metrics;
