use axum::{
    routing::{delete, get},
    Router,
};

use crate::api::controller::land::LandController;
use crate::app_state::AppState;

pub fn land_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(LandController::list_lands).post(LandController::create_land))
        .route(
            "/{id}",
            get(LandController::get_land)
                .put(LandController::update_land)
                .delete(LandController::delete_land),
        )
        .route(
            "/{id}/cameras",
            get(LandController::list_land_cameras).post(LandController::assign_camera),
        )
        .route("/{id}/cameras/{camera_id}", delete(LandController::unassign_camera))
}
