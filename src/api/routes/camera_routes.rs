use axum::{routing::get, Router};

use crate::api::controller::camera::CameraController;
use crate::app_state::AppState;

pub fn camera_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(CameraController::list_cameras).post(CameraController::create_camera),
        )
        .route(
            "/{id}",
            get(CameraController::get_camera)
                .put(CameraController::update_camera)
                .delete(CameraController::delete_camera),
        )
}
