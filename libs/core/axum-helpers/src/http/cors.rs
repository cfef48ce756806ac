use axum::http::{HeaderValue, Method, header};
use core_config::{ConfigError, FromEnv};
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Cross-origin configuration.
///
/// `CORS_ALLOWED_ORIGIN` holds comma-separated origins. When unset or blank
/// no CORS layer is installed.
#[derive(Clone, Debug, Default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<HeaderValue>,
}

impl CorsConfig {
    pub fn layer(&self) -> Option<CorsLayer> {
        if self.allowed_origins.is_empty() {
            None
        } else {
            Some(create_cors_layer(self.allowed_origins.clone()))
        }
    }
}

impl FromEnv for CorsConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let Ok(raw) = std::env::var("CORS_ALLOWED_ORIGIN") else {
            return Ok(Self::default());
        };

        let allowed_origins = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<HeaderValue>().map_err(|e| ConfigError::ParseError {
                    key: "CORS_ALLOWED_ORIGIN".to_string(),
                    details: format!("'{}': {}", s, e),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { allowed_origins })
    }
}

/// Creates a CORS layer for the catalog API.
///
/// - the given origins
/// - GET, POST, PUT, DELETE, OPTIONS
/// - Content-Type, Authorization, Accept
/// - 1 hour max age
pub fn create_cors_layer(allowed_origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
