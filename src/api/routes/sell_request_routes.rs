use axum::{
    routing::{get, patch},
    Router,
};

use crate::api::controller::sell_request::SellRequestController;
use crate::app_state::AppState;

pub fn sell_request_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(SellRequestController::list_sell_requests)
                .post(SellRequestController::create_sell_request),
        )
        .route(
            "/{id}",
            get(SellRequestController::get_sell_request)
                .delete(SellRequestController::delete_sell_request),
        )
        .route("/{id}/approve", patch(SellRequestController::approve_sell_request))
        .route("/{id}/reject", patch(SellRequestController::reject_sell_request))
}
