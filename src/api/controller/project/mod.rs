use axum::extract::{Path, Query, State};
use axum::Json;
use serde_json::Value;

use crate::api::auth::AuthUser;
use crate::api::dto::inventory_dto::ProjectListQuery;
use crate::api::dto::ApiResponse;
use crate::api::util::json::to_json;
use crate::app_state::AppState;
use crate::core::persistence::project::project_entity::ProjectEntity;
use crate::domain::inventory::dto::project_upsert_request::ProjectUpsertRequest;
use crate::domain::inventory::service::project_service::ProjectDetail;
use crate::errors::AppError;

pub struct ProjectController;

impl ProjectController {
    pub async fn list_projects(
        State(state): State<AppState>,
        Query(query): Query<ProjectListQuery>,
    ) -> Result<Json<ApiResponse<Vec<ProjectEntity>>>, AppError> {
        to_json(state.inventory_service.list_projects(query).await)
    }

    pub async fn get_project(
        State(state): State<AppState>,
        Path(id): Path<String>,
    ) -> Result<Json<ApiResponse<ProjectDetail>>, AppError> {
        to_json(state.inventory_service.get_project(id).await)
    }

    pub async fn create_project(
        State(state): State<AppState>,
        user: AuthUser,
        Json(payload): Json<ProjectUpsertRequest>,
    ) -> Result<Json<ApiResponse<ProjectEntity>>, AppError> {
        to_json(state.inventory_service.create_project(user.actor(), payload).await)
    }

    pub async fn update_project(
        State(state): State<AppState>,
        user: AuthUser,
        Path(id): Path<String>,
        Json(payload): Json<ProjectUpsertRequest>,
    ) -> Result<Json<ApiResponse<ProjectEntity>>, AppError> {
        to_json(
            state
                .inventory_service
                .update_project(user.actor(), id, payload)
                .await,
        )
    }

    pub async fn delete_project(
        State(state): State<AppState>,
        user: AuthUser,
        Path(id): Path<String>,
    ) -> Result<Json<ApiResponse<Value>>, AppError> {
        to_json(state.inventory_service.delete_project(user.actor(), id).await)
    }
}
