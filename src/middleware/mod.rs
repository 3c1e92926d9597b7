//! Middleware components for the Zalo client.
//!
//! Middleware wraps the raw reqwest transport using Tower patterns and is
//! installed with [`ZaloClientBuilder::with_middleware`](crate::client::ZaloClientBuilder::with_middleware).
//! The pipeline itself has no retry or timeout policy; layers added here are
//! where a caller would put one.
//!
//! ## Middleware Types
//!
//! - [`LoggingMiddleware`] - Logs request/response information with the
//!   encrypted payload redacted
//!
//! ## Usage
//!
//! ```ignore
//! use zalo_web_sdk::middleware::LoggingMiddleware;
//!
//! let client = ZaloClient::builder()
//!     .session(session)
//!     .credentials(credentials)
//!     .with_middleware(LoggingMiddleware::new().verbose())
//!     .build()?;
//! ```

// Re-export tower types for convenience
pub use tower::{Layer, Service, ServiceBuilder};

mod logging;

pub use logging::{LoggingMiddleware, LoggingMiddlewareService};
