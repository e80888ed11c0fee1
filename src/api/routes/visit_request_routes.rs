//! Site-visit routes (e.g., /api/v1/visit-requests/*)

use axum::{
    routing::{get, patch},
    Router,
};

use crate::api::controller::visit_request::VisitRequestController;
use crate::app_state::AppState;

pub fn visit_request_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(VisitRequestController::list_visit_requests)
                .post(VisitRequestController::create_visit_request),
        )
        .route("/verify/{token}", get(VisitRequestController::verify_visit_pass))
        .route(
            "/{id}",
            get(VisitRequestController::get_visit_request)
                .delete(VisitRequestController::delete_visit_request),
        )
        .route("/{id}/approve", patch(VisitRequestController::approve_visit_request))
        .route("/{id}/reject", patch(VisitRequestController::reject_visit_request))
}
