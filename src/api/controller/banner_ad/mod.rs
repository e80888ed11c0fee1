use axum::extract::{Path, State};
use axum::Json;
use serde_json::Value;

use crate::api::auth::AuthUser;
use crate::api::dto::ApiResponse;
use crate::api::util::json::to_json;
use crate::app_state::AppState;
use crate::core::persistence::banner_ad::banner_ad_entity::BannerAdEntity;
use crate::domain::engagement::dto::banner_ad_upsert_request::BannerAdUpsertRequest;
use crate::errors::AppError;

pub struct BannerAdController;

impl BannerAdController {
    pub async fn list_active_banner_ads(
        State(state): State<AppState>,
    ) -> Result<Json<ApiResponse<Vec<BannerAdEntity>>>, AppError> {
        to_json(state.engagement_service.list_active_banner_ads().await)
    }

    pub async fn list_all_banner_ads(
        State(state): State<AppState>,
        user: AuthUser,
    ) -> Result<Json<ApiResponse<Vec<BannerAdEntity>>>, AppError> {
        to_json(state.engagement_service.list_all_banner_ads(user.actor()).await)
    }

    pub async fn create_banner_ad(
        State(state): State<AppState>,
        user: AuthUser,
        Json(payload): Json<BannerAdUpsertRequest>,
    ) -> Result<Json<ApiResponse<BannerAdEntity>>, AppError> {
        to_json(state.engagement_service.create_banner_ad(user.actor(), payload).await)
    }

    pub async fn update_banner_ad(
        State(state): State<AppState>,
        user: AuthUser,
        Path(id): Path<String>,
        Json(payload): Json<BannerAdUpsertRequest>,
    ) -> Result<Json<ApiResponse<BannerAdEntity>>, AppError> {
        to_json(
            state
                .engagement_service
                .update_banner_ad(user.actor(), id, payload)
                .await,
        )
    }

    pub async fn toggle_banner_ad(
        State(state): State<AppState>,
        user: AuthUser,
        Path(id): Path<String>,
    ) -> Result<Json<ApiResponse<BannerAdEntity>>, AppError> {
        to_json(state.engagement_service.toggle_banner_ad(user.actor(), id).await)
    }

    pub async fn delete_banner_ad(
        State(state): State<AppState>,
        user: AuthUser,
        Path(id): Path<String>,
    ) -> Result<Json<ApiResponse<Value>>, AppError> {
        to_json(state.engagement_service.delete_banner_ad(user.actor(), id).await)
    }
}
