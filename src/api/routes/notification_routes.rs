//! Notification routes (e.g., /api/v1/notifications/*)

use axum::{
    routing::{delete, get, patch},
    Router,
};

use crate::api::controller::notification::NotificationController;
use crate::app_state::AppState;

pub fn notification_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(NotificationController::list_notifications).post(NotificationController::broadcast),
        )
        .route("/unread-count", get(NotificationController::unread_count))
        .route("/read-all", patch(NotificationController::mark_all_read))
        .route("/{id}", delete(NotificationController::delete_notification))
        .route("/{id}/read", patch(NotificationController::mark_read))
}
