//! Application state management.
//!
//! The state holds the configuration and the catalog store selected at
//! startup: PostgreSQL when `DATABASE_URL` is set, in-memory otherwise.

use core_config::database::DatabaseConfig;
use domain_catalog::{InMemoryCatalogRepository, PgCatalogRepository};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database};
use tracing::info;

use crate::config::Config;

/// Backing store for categories and products
#[derive(Clone)]
pub enum CatalogStore {
    InMemory(InMemoryCatalogRepository),
    Postgres(PgCatalogRepository),
}

impl CatalogStore {
    /// Connects to PostgreSQL and applies pending migrations, or falls back to memory.
    pub async fn connect(config: &DatabaseConfig) -> eyre::Result<Self> {
        let Some(url) = config.url.as_deref() else {
            info!("DATABASE_URL not set, keeping the catalog in memory");
            return Ok(Self::InMemory(InMemoryCatalogRepository::new()));
        };

        let mut options = ConnectOptions::new(url);
        options
            .max_connections(config.max_connections)
            .sqlx_logging(false);

        let db = Database::connect(options)
            .await
            .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

        Migrator::up(&db, None)
            .await
            .map_err(|e| eyre::eyre!("Migrations failed: {}", e))?;

        info!(
            max_connections = config.max_connections,
            "Connected to PostgreSQL, migrations applied"
        );
        Ok(Self::Postgres(PgCatalogRepository::new(db)))
    }

    /// Releases the database pool, if any.
    pub async fn close(self) {
        match self {
            Self::InMemory(_) => info!("In-memory catalog dropped"),
            Self::Postgres(repository) => match repository.db().clone().close().await {
                Ok(_) => info!("PostgreSQL connection closed successfully"),
                Err(e) => tracing::error!("Error closing PostgreSQL: {}", e),
            },
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: Config,
    pub store: CatalogStore,
}
