//! HTTP middleware module.
//!
//! - CORS configuration (opt-in through `CORS_ALLOWED_ORIGIN`)
//! - Security headers
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::http::{CorsConfig, security_headers};
//!
//! let mut app = Router::new().layer(axum::middleware::from_fn(security_headers));
//! if let Some(cors) = CorsConfig::from_env()?.layer() {
//!     app = app.layer(cors);
//! }
//! ```

pub mod cors;
pub mod security;

pub use cors::{CorsConfig, create_cors_layer};
pub use security::security_headers;
