use axum::{
    routing::{delete, get},
    Router,
};

use crate::api::controller::feedback::FeedbackController;
use crate::app_state::AppState;

pub fn feedback_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(FeedbackController::list_feedback).post(FeedbackController::create_feedback),
        )
        .route("/{id}", delete(FeedbackController::delete_feedback))
}
