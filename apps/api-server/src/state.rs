//! Application state - shared across all handlers.

use std::sync::Arc;

use publisher_core::RepoError;
use publisher_core::ports::PostRepository;
use publisher_infra::{DatabaseConfig, DatabaseConnections, InMemoryPostRepository};

#[cfg(feature = "postgres")]
use publisher_infra::PostgresPostRepository;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
    pub db: Option<Arc<DatabaseConnections>>,
}

impl AppState {
    /// Build the application state.
    ///
    /// Without a database configuration the in-memory store is used. A
    /// configured database that cannot be reached is a startup error.
    pub async fn new(db_config: Option<&DatabaseConfig>) -> Result<Self, RepoError> {
        let Some(config) = db_config else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Ok(Self::in_memory());
        };

        Self::connect(config).await
    }

    #[cfg(feature = "postgres")]
    async fn connect(config: &DatabaseConfig) -> Result<Self, RepoError> {
        let connections = Arc::new(DatabaseConnections::init(config).await?);
        let posts = Arc::new(PostgresPostRepository::new(connections.main.clone()));

        tracing::info!("Application state initialized");
        Ok(Self {
            posts,
            db: Some(connections),
        })
    }

    #[cfg(not(feature = "postgres"))]
    async fn connect(_config: &DatabaseConfig) -> Result<Self, RepoError> {
        tracing::warn!("Built without postgres feature - ignoring DATABASE_URL");
        Ok(Self::in_memory())
    }

    /// State backed by the in-memory post store.
    pub fn in_memory() -> Self {
        Self::with_repository(Arc::new(InMemoryPostRepository::new()))
    }

    /// State backed by an arbitrary post store, without a database handle.
    pub fn with_repository(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts, db: None }
    }

    /// Name of the active storage backend.
    pub fn storage_backend(&self) -> &'static str {
        if self.db.is_some() { "postgres" } else { "memory" }
    }

    /// Drain the database pool, if any.
    pub async fn shutdown(&self) {
        if let Some(db) = &self.db {
            if let Err(e) = db.close().await {
                tracing::error!(error = %e, "Failed to close database pool");
            }
        }
    }
}
