#[cfg(feature = "postgres")]
use std::sync::Arc;
use std::time::Duration;

use publisher_core::RepoError;

#[cfg(feature = "postgres")]
use sea_orm::{ConnectOptions, Database, DbConn};

#[cfg(feature = "postgres")]
use super::errors::map_db_err;

/// Configuration for the posts database.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
}

/// Process-wide storage handle.
///
/// Initialized once at startup and shared by reference; call
/// [`DatabaseConnections::close`] on shutdown to drain the pool.
#[cfg(feature = "postgres")]
pub struct DatabaseConnections {
    pub main: Arc<DbConn>,
}

#[cfg(not(feature = "postgres"))]
pub struct DatabaseConnections {
    _private: (),
}

#[cfg(feature = "postgres")]
impl DatabaseConnections {
    /// Open the connection pool described by `config`.
    pub async fn init(config: &DatabaseConfig) -> Result<Self, RepoError> {
        tracing::info!("Initializing database connection pool...");

        let opts = ConnectOptions::new(&config.url)
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(config.connect_timeout)
            .idle_timeout(Duration::from_secs(300))
            .sqlx_logging(true)
            .to_owned();

        let main = Database::connect(opts)
            .await
            .map_err(|e| RepoError::Connection(e.to_string()))?;

        tracing::info!(
            max_connections = config.max_connections,
            "Database connected"
        );

        Ok(Self {
            main: Arc::new(main),
        })
    }

    /// Round-trip to the database.
    pub async fn ping(&self) -> Result<(), RepoError> {
        self.main.ping().await.map_err(map_db_err)
    }

    /// Close every pooled connection.
    pub async fn close(&self) -> Result<(), RepoError> {
        tracing::info!("Closing database connection pool");
        self.main.close_by_ref().await.map_err(map_db_err)
    }
}

#[cfg(not(feature = "postgres"))]
impl DatabaseConnections {
    pub async fn init(_config: &DatabaseConfig) -> Result<Self, RepoError> {
        Err(RepoError::Connection(
            "built without the postgres feature".to_string(),
        ))
    }

    pub async fn ping(&self) -> Result<(), RepoError> {
        Ok(())
    }

    pub async fn close(&self) -> Result<(), RepoError> {
        Ok(())
    }
}
