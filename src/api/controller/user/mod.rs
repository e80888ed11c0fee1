use axum::extract::{Path, Query, State};
use axum::Json;
use serde_json::Value;

use crate::api::auth::AuthUser;
use crate::api::dto::paginated_response::PaginatedResponse;
use crate::api::dto::user_dto::UserListQuery;
use crate::api::dto::ApiResponse;
use crate::api::util::json::to_json;
use crate::app_state::AppState;
use crate::core::persistence::user::user_entity::UserEntity;
use crate::domain::user::dto::user_update_request::{UserAdminUpdateRequest, UserProfileUpdateRequest};
use crate::errors::AppError;

pub struct UserController;

impl UserController {
    pub async fn get_me(
        State(state): State<AppState>,
        user: AuthUser,
    ) -> Result<Json<ApiResponse<UserEntity>>, AppError> {
        to_json(state.user_service.get_me(user.actor()).await)
    }

    pub async fn update_me(
        State(state): State<AppState>,
        user: AuthUser,
        Json(payload): Json<UserProfileUpdateRequest>,
    ) -> Result<Json<ApiResponse<UserEntity>>, AppError> {
        to_json(state.user_service.update_me(user.actor(), payload).await)
    }

    pub async fn list_users(
        State(state): State<AppState>,
        user: AuthUser,
        Query(query): Query<UserListQuery>,
    ) -> Result<Json<ApiResponse<PaginatedResponse<UserEntity>>>, AppError> {
        to_json(state.user_service.list_users(user.actor(), query).await)
    }

    pub async fn get_user(
        State(state): State<AppState>,
        user: AuthUser,
        Path(id): Path<String>,
    ) -> Result<Json<ApiResponse<UserEntity>>, AppError> {
        to_json(state.user_service.get_user(user.actor(), id).await)
    }

    pub async fn update_user(
        State(state): State<AppState>,
        user: AuthUser,
        Path(id): Path<String>,
        Json(payload): Json<UserAdminUpdateRequest>,
    ) -> Result<Json<ApiResponse<UserEntity>>, AppError> {
        to_json(state.user_service.update_user(user.actor(), id, payload).await)
    }

    pub async fn delete_user(
        State(state): State<AppState>,
        user: AuthUser,
        Path(id): Path<String>,
    ) -> Result<Json<ApiResponse<Value>>, AppError> {
        to_json(state.user_service.delete_user(user.actor(), id).await)
    }

    pub async fn sync_user(
        State(state): State<AppState>,
        user: AuthUser,
        Path(id): Path<String>,
    ) -> Result<Json<ApiResponse<UserEntity>>, AppError> {
        to_json(state.user_service.sync_user(user.actor(), id).await)
    }
}
