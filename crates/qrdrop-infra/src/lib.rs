//! qrdrop Infrastructure Library
//!
//! Shared infrastructure for the qrdrop server:
//! - Middleware (request ID, security headers)
//! - Tracing subscriber initialisation

#[cfg(feature = "middleware")]
pub mod middleware;

#[cfg(feature = "observability-basic")]
pub mod telemetry;

// Re-export commonly used types
#[cfg(feature = "middleware")]
pub use middleware::{
    get_request_id, request_id_middleware, security_headers_middleware, RequestId,
};

#[cfg(feature = "observability-basic")]
pub use telemetry::{init_telemetry, shutdown_telemetry};
