use axum::{routing::get, Router};

use crate::api::controller::office::OfficeController;
use crate::app_state::AppState;

pub fn office_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(OfficeController::list_offices).post(OfficeController::create_office),
        )
        .route(
            "/{id}",
            get(OfficeController::get_office)
                .put(OfficeController::update_office)
                .delete(OfficeController::delete_office),
        )
}
