//! HTTP handlers and route configuration.

mod health;
mod posts;

use actix_web::web;

use crate::middleware::error::body_configs;
use crate::state::AppState;

/// Register shared state, body limits and routes.
pub fn configure_app(cfg: &mut web::ServiceConfig, state: &AppState, body_limit: usize) {
    let (payload_config, json_config, form_config) = body_configs(body_limit);

    cfg.app_data(web::Data::new(state.clone()))
        .app_data(payload_config)
        .app_data(json_config)
        .app_data(form_config);

    configure_routes(cfg);
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/publisher")
            .route("", web::get().to(health::index))
            .route("/", web::get().to(health::index))
            .route("/health", web::get().to(health::health_check))
            // Post lifecycle
            .route("/publish", web::post().to(posts::publish))
            .route("/add", web::post().to(posts::publish))
            .route("/post/{id}", web::get().to(posts::get_post))
            .route("/posts", web::get().to(posts::list_posts))
            .route("/posts", web::post().to(posts::delete_posts)),
    );
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, test};

    use super::*;

    #[actix_web::test]
    async fn test_index_reports_liveness() {
        let state = AppState::in_memory();
        let app =
            test::init_service(App::new().configure(|cfg| configure_app(cfg, &state, 1024))).await;

        let req = test::TestRequest::get().uri("/publisher/").to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body.as_ref(), b"The server is working!");
    }

    #[actix_web::test]
    async fn test_health_reports_memory_backend() {
        let state = AppState::in_memory();
        let app =
            test::init_service(App::new().configure(|cfg| configure_app(cfg, &state, 1024))).await;

        let req = test::TestRequest::get().uri("/publisher/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["storage"], "memory");
    }

    #[actix_web::test]
    async fn test_oversized_body_is_rejected() {
        let state = AppState::in_memory();
        let app =
            test::init_service(App::new().configure(|cfg| configure_app(cfg, &state, 16))).await;

        let req = test::TestRequest::post()
            .uri("/publisher/publish")
            .set_json(serde_json::json!({"title": "Hello", "content": "a much longer body"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_client_error());
        assert_eq!(state.storage_backend(), "memory");
    }
}
