use axum::extract::{Path, Query, State};
use axum::Json;
use serde_json::Value;

use crate::api::auth::AuthUser;
use crate::api::dto::request_dto::CameraListQuery;
use crate::api::dto::ApiResponse;
use crate::api::util::json::to_json;
use crate::app_state::AppState;
use crate::core::persistence::camera::camera_entity::CameraEntity;
use crate::domain::property::dto::camera_request::CameraUpsertRequest;
use crate::errors::AppError;

pub struct CameraController;

impl CameraController {
    pub async fn list_cameras(
        State(state): State<AppState>,
        user: AuthUser,
        Query(query): Query<CameraListQuery>,
    ) -> Result<Json<ApiResponse<Vec<CameraEntity>>>, AppError> {
        to_json(state.property_service.list_cameras(user.actor(), query).await)
    }

    pub async fn get_camera(
        State(state): State<AppState>,
        user: AuthUser,
        Path(id): Path<String>,
    ) -> Result<Json<ApiResponse<CameraEntity>>, AppError> {
        to_json(state.property_service.get_camera(user.actor(), id).await)
    }

    pub async fn create_camera(
        State(state): State<AppState>,
        user: AuthUser,
        Json(payload): Json<CameraUpsertRequest>,
    ) -> Result<Json<ApiResponse<CameraEntity>>, AppError> {
        to_json(state.property_service.create_camera(user.actor(), payload).await)
    }

    pub async fn update_camera(
        State(state): State<AppState>,
        user: AuthUser,
        Path(id): Path<String>,
        Json(payload): Json<CameraUpsertRequest>,
    ) -> Result<Json<ApiResponse<CameraEntity>>, AppError> {
        to_json(state.property_service.update_camera(user.actor(), id, payload).await)
    }

    pub async fn delete_camera(
        State(state): State<AppState>,
        user: AuthUser,
        Path(id): Path<String>,
    ) -> Result<Json<ApiResponse<Value>>, AppError> {
        to_json(state.property_service.delete_camera(user.actor(), id).await)
    }
}
