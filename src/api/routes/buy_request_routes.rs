use axum::{
    routing::{get, patch},
    Router,
};

use crate::api::controller::buy_request::BuyRequestController;
use crate::app_state::AppState;

pub fn buy_request_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(BuyRequestController::list_buy_requests)
                .post(BuyRequestController::create_buy_request),
        )
        .route(
            "/{id}",
            get(BuyRequestController::get_buy_request)
                .delete(BuyRequestController::delete_buy_request),
        )
        .route("/{id}/approve", patch(BuyRequestController::approve_buy_request))
        .route("/{id}/reject", patch(BuyRequestController::reject_buy_request))
}
