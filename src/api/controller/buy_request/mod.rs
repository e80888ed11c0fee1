use axum::extract::{Path, Query, State};
use axum::Json;
use serde_json::Value;

use crate::api::auth::AuthUser;
use crate::api::dto::request_dto::StatusQuery;
use crate::api::dto::ApiResponse;
use crate::api::util::json::to_json;
use crate::app_state::AppState;
use crate::core::persistence::buy_request::buy_request_entity::BuyRequestEntity;
use crate::domain::common::model::ReviewRejectRequest;
use crate::domain::request::dto::buy_request_create_request::BuyRequestCreateRequest;
use crate::errors::AppError;

pub struct BuyRequestController;

impl BuyRequestController {
    pub async fn create_buy_request(
        State(state): State<AppState>,
        user: AuthUser,
        Json(payload): Json<BuyRequestCreateRequest>,
    ) -> Result<Json<ApiResponse<BuyRequestEntity>>, AppError> {
        to_json(state.request_service.create_buy_request(user.actor(), payload).await)
    }

    pub async fn list_buy_requests(
        State(state): State<AppState>,
        user: AuthUser,
        Query(query): Query<StatusQuery>,
    ) -> Result<Json<ApiResponse<Vec<BuyRequestEntity>>>, AppError> {
        to_json(state.request_service.list_buy_requests(user.actor(), query).await)
    }

    pub async fn get_buy_request(
        State(state): State<AppState>,
        user: AuthUser,
        Path(id): Path<String>,
    ) -> Result<Json<ApiResponse<BuyRequestEntity>>, AppError> {
        to_json(state.request_service.get_buy_request(user.actor(), id).await)
    }

    pub async fn approve_buy_request(
        State(state): State<AppState>,
        user: AuthUser,
        Path(id): Path<String>,
    ) -> Result<Json<ApiResponse<BuyRequestEntity>>, AppError> {
        to_json(state.request_service.approve_buy_request(user.actor(), id).await)
    }

    pub async fn reject_buy_request(
        State(state): State<AppState>,
        user: AuthUser,
        Path(id): Path<String>,
        payload: Option<Json<ReviewRejectRequest>>,
    ) -> Result<Json<ApiResponse<BuyRequestEntity>>, AppError> {
        let payload = payload.map(|Json(p)| p).unwrap_or_default();
        to_json(state.request_service.reject_buy_request(user.actor(), id, payload).await)
    }

    pub async fn delete_buy_request(
        State(state): State<AppState>,
        user: AuthUser,
        Path(id): Path<String>,
    ) -> Result<Json<ApiResponse<Value>>, AppError> {
        to_json(state.request_service.delete_buy_request(user.actor(), id).await)
    }
}
