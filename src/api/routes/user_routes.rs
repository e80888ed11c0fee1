//! User routes (e.g., /api/v1/users/*)

use axum::{
    routing::{get, post},
    Router,
};

use crate::api::controller::user::UserController;
use crate::app_state::AppState;

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(UserController::list_users))
        .route("/me", get(UserController::get_me).patch(UserController::update_me))
        .route(
            "/{id}",
            get(UserController::get_user)
                .patch(UserController::update_user)
                .delete(UserController::delete_user),
        )
        .route("/{id}/sync", post(UserController::sync_user))
}
