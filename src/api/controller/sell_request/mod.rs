use axum::extract::{Path, Query, State};
use axum::Json;
use serde_json::Value;

use crate::api::auth::AuthUser;
use crate::api::dto::request_dto::StatusQuery;
use crate::api::dto::ApiResponse;
use crate::api::util::json::to_json;
use crate::app_state::AppState;
use crate::core::persistence::sell_request::sell_request_entity::SellRequestEntity;
use crate::domain::common::model::ReviewRejectRequest;
use crate::domain::request::dto::sell_request_create_request::SellRequestCreateRequest;
use crate::errors::AppError;

pub struct SellRequestController;

impl SellRequestController {
    pub async fn create_sell_request(
        State(state): State<AppState>,
        user: AuthUser,
        Json(payload): Json<SellRequestCreateRequest>,
    ) -> Result<Json<ApiResponse<SellRequestEntity>>, AppError> {
        to_json(state.request_service.create_sell_request(user.actor(), payload).await)
    }

    pub async fn list_sell_requests(
        State(state): State<AppState>,
        user: AuthUser,
        Query(query): Query<StatusQuery>,
    ) -> Result<Json<ApiResponse<Vec<SellRequestEntity>>>, AppError> {
        to_json(state.request_service.list_sell_requests(user.actor(), query).await)
    }

    pub async fn get_sell_request(
        State(state): State<AppState>,
        user: AuthUser,
        Path(id): Path<String>,
    ) -> Result<Json<ApiResponse<SellRequestEntity>>, AppError> {
        to_json(state.request_service.get_sell_request(user.actor(), id).await)
    }

    pub async fn approve_sell_request(
        State(state): State<AppState>,
        user: AuthUser,
        Path(id): Path<String>,
    ) -> Result<Json<ApiResponse<SellRequestEntity>>, AppError> {
        to_json(state.request_service.approve_sell_request(user.actor(), id).await)
    }

    pub async fn reject_sell_request(
        State(state): State<AppState>,
        user: AuthUser,
        Path(id): Path<String>,
        payload: Option<Json<ReviewRejectRequest>>,
    ) -> Result<Json<ApiResponse<SellRequestEntity>>, AppError> {
        let payload = payload.map(|Json(p)| p).unwrap_or_default();
        to_json(state.request_service.reject_sell_request(user.actor(), id, payload).await)
    }

    pub async fn delete_sell_request(
        State(state): State<AppState>,
        user: AuthUser,
        Path(id): Path<String>,
    ) -> Result<Json<ApiResponse<Value>>, AppError> {
        to_json(state.request_service.delete_sell_request(user.actor(), id).await)
    }
}
