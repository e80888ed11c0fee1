use axum::extract::{Path, State};
use axum::Json;
use serde_json::Value;

use crate::api::auth::AuthUser;
use crate::api::dto::ApiResponse;
use crate::api::util::json::to_json;
use crate::app_state::AppState;
use crate::core::persistence::camera::camera_entity::CameraEntity;
use crate::core::persistence::land::land_entity::LandEntity;
use crate::core::persistence::land_camera::land_camera_entity::LandCameraEntity;
use crate::domain::property::dto::camera_request::CameraAssignRequest;
use crate::domain::property::dto::land_upsert_request::LandUpsertRequest;
use crate::domain::property::service::land_service::LandDetail;
use crate::errors::AppError;

pub struct LandController;

impl LandController {
    pub async fn list_lands(
        State(state): State<AppState>,
        user: AuthUser,
    ) -> Result<Json<ApiResponse<Vec<LandEntity>>>, AppError> {
        to_json(state.property_service.list_lands(user.actor()).await)
    }

    pub async fn get_land(
        State(state): State<AppState>,
        user: AuthUser,
        Path(id): Path<String>,
    ) -> Result<Json<ApiResponse<LandDetail>>, AppError> {
        to_json(state.property_service.get_land(user.actor(), id).await)
    }

    pub async fn create_land(
        State(state): State<AppState>,
        user: AuthUser,
        Json(payload): Json<LandUpsertRequest>,
    ) -> Result<Json<ApiResponse<LandEntity>>, AppError> {
        to_json(state.property_service.create_land(user.actor(), payload).await)
    }

    pub async fn update_land(
        State(state): State<AppState>,
        user: AuthUser,
        Path(id): Path<String>,
        Json(payload): Json<LandUpsertRequest>,
    ) -> Result<Json<ApiResponse<LandEntity>>, AppError> {
        to_json(state.property_service.update_land(user.actor(), id, payload).await)
    }

    pub async fn delete_land(
        State(state): State<AppState>,
        user: AuthUser,
        Path(id): Path<String>,
    ) -> Result<Json<ApiResponse<Value>>, AppError> {
        to_json(state.property_service.delete_land(user.actor(), id).await)
    }

    pub async fn list_land_cameras(
        State(state): State<AppState>,
        user: AuthUser,
        Path(id): Path<String>,
    ) -> Result<Json<ApiResponse<Vec<CameraEntity>>>, AppError> {
        to_json(state.property_service.list_land_cameras(user.actor(), id).await)
    }

    pub async fn assign_camera(
        State(state): State<AppState>,
        user: AuthUser,
        Path(id): Path<String>,
        Json(payload): Json<CameraAssignRequest>,
    ) -> Result<Json<ApiResponse<LandCameraEntity>>, AppError> {
        to_json(state.property_service.assign_camera(user.actor(), id, payload).await)
    }

    pub async fn unassign_camera(
        State(state): State<AppState>,
        user: AuthUser,
        Path((id, camera_id)): Path<(String, String)>,
    ) -> Result<Json<ApiResponse<Value>>, AppError> {
        to_json(
            state
                .property_service
                .unassign_camera(user.actor(), id, camera_id)
                .await,
        )
    }
}
