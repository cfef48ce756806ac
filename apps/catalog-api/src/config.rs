use axum_helpers::{AuthConfig, CorsConfig};
use core_config::{AppInfo, FromEnv, app_info, database::DatabaseConfig, server::ServerConfig};

pub use core_config::Environment;

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub cors: CorsConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let database = DatabaseConfig::from_env()?; // Optional URL, in-memory store without it
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8080
        let auth = AuthConfig::from_env()?; // Required in production
        let cors = CorsConfig::from_env()?;

        Ok(Self {
            app: app_info!(),
            database,
            server,
            auth,
            cors,
            environment,
        })
    }
}
