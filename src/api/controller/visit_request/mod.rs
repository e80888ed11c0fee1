use axum::extract::{Path, Query, State};
use axum::Json;
use serde_json::Value;

use crate::api::auth::AuthUser;
use crate::api::dto::request_dto::StatusQuery;
use crate::api::dto::ApiResponse;
use crate::api::util::json::to_json;
use crate::app_state::AppState;
use crate::core::persistence::visit_request::visit_request_entity::VisitRequestEntity;
use crate::domain::common::model::ReviewRejectRequest;
use crate::domain::request::dto::visit_request_create_request::VisitRequestCreateRequest;
use crate::domain::request::service::visit_request_service::VisitPassCheck;
use crate::errors::AppError;

pub struct VisitRequestController;

impl VisitRequestController {
    pub async fn create_visit_request(
        State(state): State<AppState>,
        user: AuthUser,
        Json(payload): Json<VisitRequestCreateRequest>,
    ) -> Result<Json<ApiResponse<VisitRequestEntity>>, AppError> {
        to_json(state.request_service.create_visit_request(user.actor(), payload).await)
    }

    pub async fn list_visit_requests(
        State(state): State<AppState>,
        user: AuthUser,
        Query(query): Query<StatusQuery>,
    ) -> Result<Json<ApiResponse<Vec<VisitRequestEntity>>>, AppError> {
        to_json(state.request_service.list_visit_requests(user.actor(), query).await)
    }

    pub async fn get_visit_request(
        State(state): State<AppState>,
        user: AuthUser,
        Path(id): Path<String>,
    ) -> Result<Json<ApiResponse<VisitRequestEntity>>, AppError> {
        to_json(state.request_service.get_visit_request(user.actor(), id).await)
    }

    pub async fn approve_visit_request(
        State(state): State<AppState>,
        user: AuthUser,
        Path(id): Path<String>,
    ) -> Result<Json<ApiResponse<VisitRequestEntity>>, AppError> {
        to_json(state.request_service.approve_visit_request(user.actor(), id).await)
    }

    /// Body is optional; an empty body rejects without a reason.
    pub async fn reject_visit_request(
        State(state): State<AppState>,
        user: AuthUser,
        Path(id): Path<String>,
        payload: Option<Json<ReviewRejectRequest>>,
    ) -> Result<Json<ApiResponse<VisitRequestEntity>>, AppError> {
        let payload = payload.map(|Json(p)| p).unwrap_or_default();
        to_json(
            state
                .request_service
                .reject_visit_request(user.actor(), id, payload)
                .await,
        )
    }

    pub async fn verify_visit_pass(
        State(state): State<AppState>,
        user: AuthUser,
        Path(token): Path<String>,
    ) -> Result<Json<ApiResponse<VisitPassCheck>>, AppError> {
        to_json(state.request_service.verify_visit_pass(user.actor(), token).await)
    }

    pub async fn delete_visit_request(
        State(state): State<AppState>,
        user: AuthUser,
        Path(id): Path<String>,
    ) -> Result<Json<ApiResponse<Value>>, AppError> {
        to_json(state.request_service.delete_visit_request(user.actor(), id).await)
    }
}
