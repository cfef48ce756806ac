use crate::{env_parse, ConfigError, FromEnv};
use std::env;

/// Database configuration.
///
/// `url` is optional: without `DATABASE_URL` the service keeps its data in memory.
#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            max_connections: 10,
        }
    }

    pub fn in_memory() -> Self {
        Self {
            url: None,
            max_connections: 10,
        }
    }

    pub fn is_persistent(&self) -> bool {
        self.url.is_some()
    }
}

impl FromEnv for DatabaseConfig {
    /// - DATABASE_URL: optional, blank counts as unset
    /// - DB_MAX_CONNECTIONS: defaults to 10
    fn from_env() -> Result<Self, ConfigError> {
        let url = env::var("DATABASE_URL")
            .ok()
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());
        let max_connections = env_parse("DB_MAX_CONNECTIONS", 10u32)?;

        Ok(Self {
            url,
            max_connections,
        })
    }
}
