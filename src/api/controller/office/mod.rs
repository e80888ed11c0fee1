use axum::extract::{Path, State};
use axum::Json;
use serde_json::Value;

use crate::api::auth::AuthUser;
use crate::api::dto::ApiResponse;
use crate::api::util::json::to_json;
use crate::app_state::AppState;
use crate::core::persistence::office::office_entity::OfficeEntity;
use crate::domain::user::dto::office_upsert_request::OfficeUpsertRequest;
use crate::errors::AppError;

pub struct OfficeController;

impl OfficeController {
    pub async fn list_offices(
        State(state): State<AppState>,
    ) -> Result<Json<ApiResponse<Vec<OfficeEntity>>>, AppError> {
        to_json(state.user_service.list_offices().await)
    }

    pub async fn get_office(
        State(state): State<AppState>,
        Path(id): Path<String>,
    ) -> Result<Json<ApiResponse<OfficeEntity>>, AppError> {
        to_json(state.user_service.get_office(id).await)
    }

    pub async fn create_office(
        State(state): State<AppState>,
        user: AuthUser,
        Json(payload): Json<OfficeUpsertRequest>,
    ) -> Result<Json<ApiResponse<OfficeEntity>>, AppError> {
        to_json(state.user_service.create_office(user.actor(), payload).await)
    }

    pub async fn update_office(
        State(state): State<AppState>,
        user: AuthUser,
        Path(id): Path<String>,
        Json(payload): Json<OfficeUpsertRequest>,
    ) -> Result<Json<ApiResponse<OfficeEntity>>, AppError> {
        to_json(state.user_service.update_office(user.actor(), id, payload).await)
    }

    pub async fn delete_office(
        State(state): State<AppState>,
        user: AuthUser,
        Path(id): Path<String>,
    ) -> Result<Json<ApiResponse<Value>>, AppError> {
        to_json(state.user_service.delete_office(user.actor(), id).await)
    }
}
