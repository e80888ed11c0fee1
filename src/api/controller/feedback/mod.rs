use axum::extract::{Path, State};
use axum::Json;
use serde_json::Value;

use crate::api::auth::AuthUser;
use crate::api::dto::ApiResponse;
use crate::api::util::json::to_json;
use crate::app_state::AppState;
use crate::core::persistence::feedback::feedback_entity::FeedbackEntity;
use crate::domain::engagement::dto::feedback_create_request::FeedbackCreateRequest;
use crate::domain::engagement::service::feedback_service::FeedbackSummary;
use crate::errors::AppError;

pub struct FeedbackController;

impl FeedbackController {
    pub async fn create_feedback(
        State(state): State<AppState>,
        user: AuthUser,
        Json(payload): Json<FeedbackCreateRequest>,
    ) -> Result<Json<ApiResponse<FeedbackEntity>>, AppError> {
        to_json(state.engagement_service.create_feedback(user.actor(), payload).await)
    }

    pub async fn list_feedback(
        State(state): State<AppState>,
        user: AuthUser,
    ) -> Result<Json<ApiResponse<FeedbackSummary>>, AppError> {
        to_json(state.engagement_service.list_feedback(user.actor()).await)
    }

    pub async fn delete_feedback(
        State(state): State<AppState>,
        user: AuthUser,
        Path(id): Path<String>,
    ) -> Result<Json<ApiResponse<Value>>, AppError> {
        to_json(state.engagement_service.delete_feedback(user.actor(), id).await)
    }
}
