//! # einlass-observability
//!
//! Observability-Crate fuer Einlass:
//! - Structured Logging (Text oder JSON) via tracing-subscriber
//! - Request-Timing Middleware fuer Axum

pub mod logging;
pub mod middleware;

pub use logging::{log_format_gueltig, log_level_gueltig, logging_initialisieren};
pub use middleware::{request_timing_layer, timing_middleware};
