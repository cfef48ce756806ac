//! Server infrastructure module.
//!
//! - Router assembly with the cross-cutting middleware stack
//! - Liveness endpoint
//! - Graceful shutdown coordination
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::server::{create_production_app, create_router};
//! use core_config::app_info;
//!
//! let router = create_router(api_routes, app_info!(), auth, &cors);
//! create_production_app(router, &server_config, async move { db.close().await.ok(); }).await?;
//! ```

pub mod app;
pub mod health;
pub mod shutdown;

pub use app::{create_production_app, create_router};
pub use health::{HealthResponse, health_router};
pub use shutdown::ShutdownCoordinator;
