use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use tower_http::cors::CorsLayer;

use crate::api::routes::{
    analytics_routes::analytics_routes, banner_ad_routes::banner_ad_routes,
    buy_request_routes::buy_request_routes, camera_routes::camera_routes,
    feedback_routes::feedback_routes, land_routes::land_routes,
    leave_request_routes::leave_request_routes, notification_routes::notification_routes,
    office_routes::office_routes, plot_routes::plot_routes, project_routes::project_routes,
    sell_request_routes::sell_request_routes, system_routes::system_routes,
    user_routes::user_routes, visit_request_routes::visit_request_routes,
    webhook_routes::webhook_routes,
};
use crate::app_state::AppState;

/// Build the main application router
pub fn app_router() -> Router<AppState> {
    let api_v1 = Router::new()
        .nest("/users", user_routes())
        .nest("/offices", office_routes())
        .nest("/projects", project_routes())
        .nest("/plots", plot_routes())
        .nest("/lands", land_routes())
        .nest("/cameras", camera_routes())
        .nest("/visit-requests", visit_request_routes())
        .nest("/buy-requests", buy_request_routes())
        .nest("/sell-requests", sell_request_routes())
        .nest("/feedback", feedback_routes())
        .nest("/notifications", notification_routes())
        .nest("/banner-ads", banner_ad_routes())
        .nest("/leave-requests", leave_request_routes())
        .nest("/analytics", analytics_routes())
        .nest("/system", system_routes())
        .nest("/webhooks", webhook_routes());

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", api_v1)
        .fallback(handler_404)
        .layer(CorsLayer::very_permissive())
}

async fn root() -> &'static str {
    "Server is running!"
}

async fn health_check() -> &'static str {
    "OK"
}

async fn handler_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        "The requested resource was not found",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_state::build_app_state;
    use crate::config::AppConfig;
    use crate::core::persistence::database::Database;
    use crate::core::persistence::user::user_entity::Role;
    use crate::domain::common::service::test_support::{seed_plot, seed_project, seed_user};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    async fn app() -> (Router, Database) {
        let db = Database::open_in_memory().unwrap();
        let state = build_app_state(db.clone(), &AppConfig::default());
        (app_router().with_state(state), db)
    }

    async fn body_json(resp: axum::response::Response) -> Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get_req(uri: &str, user: Option<&str>) -> Request<Body> {
        let mut req = Request::builder().uri(uri);
        if let Some(user) = user {
            req = req.header("x-user-id", user);
        }
        req.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn health_and_root_respond() {
        let (app, _db) = app().await;
        let resp = app.clone().oneshot(get_req("/health", None)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let resp = app.oneshot(get_req("/", None)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_paths_fall_back_to_404() {
        let (app, _db) = app().await;
        let resp = app.oneshot(get_req("/nope", None)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn protected_routes_require_a_known_user() {
        let (app, _db) = app().await;
        let resp = app
            .clone()
            .oneshot(get_req("/api/v1/users/me", None))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp = app
            .oneshot(get_req("/api/v1/users/me", Some("ghost")))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn signed_in_user_reads_own_profile() {
        let (app, db) = app().await;
        seed_user(&db, "c1", Role::Client).await;

        let resp = app
            .oneshot(get_req("/api/v1/users/me", Some("c1")))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["id"], "c1");
        assert_eq!(body["data"]["role"], "CLIENT");
    }

    #[tokio::test]
    async fn plot_listing_is_public() {
        let (app, db) = app().await;
        seed_project(&db, "pr1").await;
        seed_plot(&db, "p1", "pr1", 1_000).await;

        let resp = app
            .oneshot(get_req("/api/v1/plots?status=AVAILABLE", None))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["data"]["total"], 1);
        assert_eq!(body["data"]["items"][0]["plot_number"], "P-p1");
    }

    #[tokio::test]
    async fn clients_are_forbidden_from_admin_routes() {
        let (app, db) = app().await;
        seed_user(&db, "c1", Role::Client).await;

        let resp = app
            .oneshot(get_req("/api/v1/system/status", Some("c1")))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let body = body_json(resp).await;
        assert!(body["message"].as_str().unwrap().contains("Forbidden"));
    }

    #[tokio::test]
    async fn webhook_without_secret_is_unavailable() {
        let (app, _db) = app().await;
        let req = Request::builder()
            .method("POST")
            .uri("/api/v1/webhooks/identity")
            .body(Body::from(r#"{"type":"user.created","data":{}}"#))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
