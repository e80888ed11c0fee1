//! System controller: connects routes to system usecases

use axum::extract::{Path, Query, State};
use axum::Json;

use crate::api::auth::AuthUser;
use crate::api::dto::system_dto::{LogQuery, PaginatedLogResponse};
use crate::api::dto::ApiResponse;
use crate::api::util::json::to_json;
use crate::app_state::AppState;
use crate::domain::system::service::status_service::SystemStatus;
use crate::errors::AppError;

pub struct SystemController;

impl SystemController {
    pub async fn status(
        State(state): State<AppState>,
        user: AuthUser,
    ) -> Result<Json<ApiResponse<SystemStatus>>, AppError> {
        to_json(state.system_service.status(user.actor()).await)
    }

    pub async fn get_system_log_file_list(
        State(state): State<AppState>,
        user: AuthUser,
    ) -> Result<Json<ApiResponse<Vec<String>>>, AppError> {
        to_json(state.log_service.get_system_log_file_list(user.actor()).await)
    }

    pub async fn get_system_log_lines(
        State(state): State<AppState>,
        user: AuthUser,
        Path(date): Path<String>,
        Query(query): Query<LogQuery>,
    ) -> Result<Json<ApiResponse<PaginatedLogResponse>>, AppError> {
        to_json(
            state
                .log_service
                .get_system_log_lines(user.actor(), &date, query.cursor, query.limit)
                .await,
        )
    }
}
