//! Error handling middleware - RFC 7807 compliant responses.

use actix_web::{HttpRequest, HttpResponse, ResponseError, error, http::StatusCode, web};
use publisher_core::{DomainError, RepoError};
use publisher_shared::{ErrorResponse, InvalidPostId};
use std::fmt;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, id } => {
                AppError::NotFound(format!("{} with id {} not found", entity_type, id))
            }
            DomainError::Validation(msg) => AppError::BadRequest(msg),
            DomainError::Storage(err) => err.into(),
        }
    }
}

// Every storage failure is a server fault; the cause only goes to the log.
impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {}", msg);
            }
            RepoError::Query(msg) => {
                tracing::error!("Database query error: {}", msg);
            }
            RepoError::Constraint(msg) => {
                tracing::error!("Database constraint violation: {}", msg);
            }
        }
        AppError::Internal("Database error".to_string())
    }
}

impl From<InvalidPostId> for AppError {
    fn from(err: InvalidPostId) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

/// Render malformed JSON bodies as problem details.
pub fn json_error_handler(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(err.to_string()).into()
}

/// Render malformed form bodies as problem details.
pub fn form_error_handler(err: error::UrlencodedError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(err.to_string()).into()
}

/// Body extractor configuration sharing one size limit.
///
/// `PayloadConfig` bounds the raw buffering done by `Either` extractors.
pub fn body_configs(limit: usize) -> (web::PayloadConfig, web::JsonConfig, web::FormConfig) {
    (
        web::PayloadConfig::new(limit),
        web::JsonConfig::default()
            .limit(limit)
            .error_handler(json_error_handler),
        web::FormConfig::default()
            .limit(limit)
            .error_handler(form_error_handler),
    )
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err: AppError = DomainError::Validation("missing title or content".into()).into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_names_the_post() {
        let err: AppError = DomainError::NotFound {
            entity_type: "Post",
            id: 9,
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Not found: Post with id 9 not found");
    }

    #[test]
    fn test_storage_errors_are_server_faults() {
        for repo_err in [
            RepoError::Connection("refused".into()),
            RepoError::Query("syntax".into()),
            RepoError::Constraint("unique".into()),
        ] {
            let err: AppError = DomainError::Storage(repo_err).into();
            assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
}
