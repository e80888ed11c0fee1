use axum::{
    routing::{delete, get, patch},
    Router,
};

use crate::api::controller::leave_request::LeaveRequestController;
use crate::app_state::AppState;

pub fn leave_request_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(LeaveRequestController::list_leave_requests)
                .post(LeaveRequestController::create_leave_request),
        )
        .route("/{id}", delete(LeaveRequestController::delete_leave_request))
        .route("/{id}/approve", patch(LeaveRequestController::approve_leave_request))
        .route("/{id}/reject", patch(LeaveRequestController::reject_leave_request))
}
