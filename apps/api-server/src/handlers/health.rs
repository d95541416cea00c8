//! Liveness and health endpoints.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub storage: &'static str,
    pub timestamp: String,
}

/// GET /publisher/
pub async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("The server is working!")
}

/// Health check endpoint - returns server and storage status.
///
/// GET /publisher/health
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let storage_ok = match &state.db {
        Some(db) => match db.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Database ping failed");
                false
            }
        },
        None => true,
    };

    let response = HealthResponse {
        status: if storage_ok { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        storage: state.storage_backend(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    if storage_ok {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}
