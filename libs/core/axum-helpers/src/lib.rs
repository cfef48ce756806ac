//! # Axum Helpers
//!
//! Shared HTTP plumbing for the catalog services.
//!
//! ## Modules
//!
//! - **[`auth`]**: HTTP basic authentication and role-based access policy
//! - **[`server`]**: Router assembly, health check, graceful shutdown
//! - **[`http`]**: HTTP middleware (CORS, security headers)
//! - **[`errors`]**: Uniform error payload and the error envelope middleware
//! - **[`extractors`]**: Custom extractors (numeric id path, validated JSON)
//! - **[`audit`]**: Audit logging for data modifications
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum_helpers::{BasicAuth, CorsConfig, StaticCredentials, create_production_app, create_router};
//! use core_config::{app_info, server::ServerConfig};
//!
//! let verifier = StaticCredentials::from_accounts(&auth_config.accounts)?;
//! let auth = BasicAuth::new(Arc::new(verifier), &auth_config.realm)?;
//! let router = create_router(api_routes, app_info!(), auth, &CorsConfig::default());
//! create_production_app(router, &ServerConfig::default(), async {}).await?;
//! ```

pub mod audit;
pub mod auth;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use auth::{
    AccessLevel, AccountSpec, AuthConfig, AuthError, BasicAuth, CredentialVerifier, Principal,
    Role, StaticCredentials, basic_auth_middleware, required_access,
};

pub use server::{
    HealthResponse, ShutdownCoordinator, create_production_app, create_router, health_router,
};

pub use http::{CorsConfig, create_cors_layer, security_headers};

pub use errors::{AppError, ErrorCode, ErrorResponse};

pub use extractors::{IdPath, ValidatedJson};

pub use audit::{AuditEvent, AuditOutcome, extract_ip_from_headers, extract_user_agent};
