//! Middleware for observability.
//!
//! Authentication and authorization gates live in `auth::middleware`.

pub mod logging;

pub use logging::request_logging;
