use axum::{
    routing::{get, patch, put},
    Router,
};

use crate::api::controller::banner_ad::BannerAdController;
use crate::app_state::AppState;

pub fn banner_ad_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(BannerAdController::list_active_banner_ads).post(BannerAdController::create_banner_ad),
        )
        .route("/all", get(BannerAdController::list_all_banner_ads))
        .route(
            "/{id}",
            put(BannerAdController::update_banner_ad).delete(BannerAdController::delete_banner_ad),
        )
        .route("/{id}/toggle", patch(BannerAdController::toggle_banner_ad))
}
