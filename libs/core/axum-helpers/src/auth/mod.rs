//! HTTP basic authentication and role-based access control.
//!
//! - [`credentials`]: principals, roles and the [`CredentialVerifier`] seam
//! - [`policy`]: which requests need which access level
//! - [`middleware`]: the basic-auth layer that enforces the policy
//! - [`config`]: accounts and realm loaded from the environment
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::auth::{AuthConfig, BasicAuth, StaticCredentials, basic_auth_middleware};
//! use core_config::FromEnv;
//!
//! let config = AuthConfig::from_env()?;
//! let verifier = StaticCredentials::from_accounts(&config.accounts)?;
//! let auth = BasicAuth::new(Arc::new(verifier), &config.realm)?;
//!
//! let app = Router::new()
//!     .nest("/api", routes)
//!     .layer(axum::middleware::from_fn_with_state(auth, basic_auth_middleware));
//! ```

pub mod config;
pub mod credentials;
pub mod middleware;
pub mod policy;

use thiserror::Error;

pub use config::{AccountSpec, AuthConfig};
pub use credentials::{CredentialVerifier, Principal, Role, StaticCredentials};
pub use middleware::{BasicAuth, basic_auth_middleware};
pub use policy::{AccessLevel, required_access};

/// Errors raised while building the authentication layer at startup.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Failed to hash password for account '{username}': {details}")]
    Hashing { username: String, details: String },

    #[error("Duplicate account '{0}'")]
    DuplicateAccount(String),

    #[error("Invalid authentication realm '{0}'")]
    InvalidRealm(String),
}
