//! # Publisher API Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_web::{App, HttpServer};
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;

use config::AppConfig;
use observability::RequestIdMiddleware;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Publisher API Server on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::new(config.database.as_ref())
        .await
        .map_err(|e| {
            tracing::error!("Failed to initialize storage: {}", e);
            std::io::Error::other(e.to_string())
        })?;

    let server_state = state.clone();
    let body_limit = config.body_limit;

    let result = HttpServer::new(move || {
        let state = server_state.clone();
        App::new()
            .wrap(TracingLogger::default())
            .wrap(RequestIdMiddleware)
            .configure(move |cfg| handlers::configure_app(cfg, &state, body_limit))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await;

    tracing::info!("HTTP server stopped, draining storage");
    state.shutdown().await;

    result
}
