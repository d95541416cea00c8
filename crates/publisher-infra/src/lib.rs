//! # Publisher Infrastructure
//!
//! Concrete implementations of the post store defined in `publisher-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL database support via SeaORM

pub mod database;

pub use database::{DatabaseConfig, DatabaseConnections, InMemoryPostRepository};

#[cfg(feature = "postgres")]
pub use database::PostgresPostRepository;
