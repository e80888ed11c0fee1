use axum::extract::{Path, Query, State};
use axum::Json;
use serde_json::Value;

use crate::api::auth::AuthUser;
use crate::api::dto::request_dto::NotificationListQuery;
use crate::api::dto::ApiResponse;
use crate::api::util::json::to_json;
use crate::app_state::AppState;
use crate::core::persistence::notification::notification_entity::NotificationEntity;
use crate::domain::engagement::dto::notification_broadcast_request::NotificationBroadcastRequest;
use crate::errors::AppError;

pub struct NotificationController;

impl NotificationController {
    pub async fn list_notifications(
        State(state): State<AppState>,
        user: AuthUser,
        Query(query): Query<NotificationListQuery>,
    ) -> Result<Json<ApiResponse<Vec<NotificationEntity>>>, AppError> {
        to_json(state.engagement_service.list_notifications(user.actor(), query).await)
    }

    pub async fn unread_count(
        State(state): State<AppState>,
        user: AuthUser,
    ) -> Result<Json<ApiResponse<Value>>, AppError> {
        to_json(state.engagement_service.unread_count(user.actor()).await)
    }

    pub async fn mark_read(
        State(state): State<AppState>,
        user: AuthUser,
        Path(id): Path<String>,
    ) -> Result<Json<ApiResponse<NotificationEntity>>, AppError> {
        to_json(state.engagement_service.mark_read(user.actor(), id).await)
    }

    pub async fn mark_all_read(
        State(state): State<AppState>,
        user: AuthUser,
    ) -> Result<Json<ApiResponse<Value>>, AppError> {
        to_json(state.engagement_service.mark_all_read(user.actor()).await)
    }

    pub async fn delete_notification(
        State(state): State<AppState>,
        user: AuthUser,
        Path(id): Path<String>,
    ) -> Result<Json<ApiResponse<Value>>, AppError> {
        to_json(state.engagement_service.delete_notification(user.actor(), id).await)
    }

    pub async fn broadcast(
        State(state): State<AppState>,
        user: AuthUser,
        Json(payload): Json<NotificationBroadcastRequest>,
    ) -> Result<Json<ApiResponse<Value>>, AppError> {
        to_json(state.engagement_service.broadcast(user.actor(), payload).await)
    }
}
