use axum::{routing::get, Router};

use crate::api::controller::project::ProjectController;
use crate::app_state::AppState;

pub fn project_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(ProjectController::list_projects).post(ProjectController::create_project),
        )
        .route(
            "/{id}",
            get(ProjectController::get_project)
                .put(ProjectController::update_project)
                .delete(ProjectController::delete_project),
        )
}
