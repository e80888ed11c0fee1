use axum::{routing::post, Router};

use crate::api::controller::webhook::WebhookController;
use crate::app_state::AppState;

pub fn webhook_routes() -> Router<AppState> {
    Router::new().route("/identity", post(WebhookController::identity))
}
