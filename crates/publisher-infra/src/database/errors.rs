use sea_orm::{DbErr, SqlErr};

use publisher_core::RepoError;

/// Classify a SeaORM error into the storage error taxonomy.
pub(crate) fn map_db_err(err: DbErr) -> RepoError {
    if let Some(sql_err) = err.sql_err() {
        return match sql_err {
            SqlErr::UniqueConstraintViolation(msg) | SqlErr::ForeignKeyConstraintViolation(msg) => {
                RepoError::Constraint(msg)
            }
            _ => RepoError::Query(err.to_string()),
        };
    }

    match err {
        DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => RepoError::Connection(err.to_string()),
        other => RepoError::Query(other.to_string()),
    }
}
