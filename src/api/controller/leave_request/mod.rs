use axum::extract::{Path, Query, State};
use axum::Json;
use serde_json::Value;

use crate::api::auth::AuthUser;
use crate::api::dto::request_dto::StatusQuery;
use crate::api::dto::ApiResponse;
use crate::api::util::json::to_json;
use crate::app_state::AppState;
use crate::core::persistence::leave_request::leave_request_entity::LeaveRequestEntity;
use crate::domain::staff::dto::leave_request_create_request::LeaveRequestCreateRequest;
use crate::errors::AppError;

pub struct LeaveRequestController;

impl LeaveRequestController {
    pub async fn create_leave_request(
        State(state): State<AppState>,
        user: AuthUser,
        Json(payload): Json<LeaveRequestCreateRequest>,
    ) -> Result<Json<ApiResponse<LeaveRequestEntity>>, AppError> {
        to_json(state.staff_service.create_leave_request(user.actor(), payload).await)
    }

    pub async fn list_leave_requests(
        State(state): State<AppState>,
        user: AuthUser,
        Query(query): Query<StatusQuery>,
    ) -> Result<Json<ApiResponse<Vec<LeaveRequestEntity>>>, AppError> {
        to_json(state.staff_service.list_leave_requests(user.actor(), query).await)
    }

    pub async fn approve_leave_request(
        State(state): State<AppState>,
        user: AuthUser,
        Path(id): Path<String>,
    ) -> Result<Json<ApiResponse<LeaveRequestEntity>>, AppError> {
        to_json(state.staff_service.approve_leave_request(user.actor(), id).await)
    }

    pub async fn reject_leave_request(
        State(state): State<AppState>,
        user: AuthUser,
        Path(id): Path<String>,
    ) -> Result<Json<ApiResponse<LeaveRequestEntity>>, AppError> {
        to_json(state.staff_service.reject_leave_request(user.actor(), id).await)
    }

    pub async fn delete_leave_request(
        State(state): State<AppState>,
        user: AuthUser,
        Path(id): Path<String>,
    ) -> Result<Json<ApiResponse<Value>>, AppError> {
        to_json(state.staff_service.delete_leave_request(user.actor(), id).await)
    }
}
