use axum::extract::{Path, Query, State};
use axum::Json;
use serde_json::Value;

use crate::api::auth::AuthUser;
use crate::api::dto::inventory_dto::PlotListQuery;
use crate::api::dto::paginated_response::PaginatedResponse;
use crate::api::dto::ApiResponse;
use crate::api::util::json::to_json;
use crate::app_state::AppState;
use crate::core::persistence::plot::plot_entity::PlotEntity;
use crate::domain::inventory::dto::plot_request::{PlotCreateRequest, PlotStatusRequest, PlotUpdateRequest};
use crate::errors::AppError;

pub struct PlotController;

impl PlotController {
    pub async fn list_plots(
        State(state): State<AppState>,
        Query(query): Query<PlotListQuery>,
    ) -> Result<Json<ApiResponse<PaginatedResponse<PlotEntity>>>, AppError> {
        to_json(state.inventory_service.list_plots(query).await)
    }

    pub async fn get_plot(
        State(state): State<AppState>,
        Path(id): Path<String>,
    ) -> Result<Json<ApiResponse<PlotEntity>>, AppError> {
        to_json(state.inventory_service.get_plot(id).await)
    }

    pub async fn create_plot(
        State(state): State<AppState>,
        user: AuthUser,
        Json(payload): Json<PlotCreateRequest>,
    ) -> Result<Json<ApiResponse<PlotEntity>>, AppError> {
        to_json(state.inventory_service.create_plot(user.actor(), payload).await)
    }

    pub async fn update_plot(
        State(state): State<AppState>,
        user: AuthUser,
        Path(id): Path<String>,
        Json(payload): Json<PlotUpdateRequest>,
    ) -> Result<Json<ApiResponse<PlotEntity>>, AppError> {
        to_json(state.inventory_service.update_plot(user.actor(), id, payload).await)
    }

    pub async fn delete_plot(
        State(state): State<AppState>,
        user: AuthUser,
        Path(id): Path<String>,
    ) -> Result<Json<ApiResponse<Value>>, AppError> {
        to_json(state.inventory_service.delete_plot(user.actor(), id).await)
    }

    pub async fn update_plot_status(
        State(state): State<AppState>,
        user: AuthUser,
        Path(id): Path<String>,
        Json(payload): Json<PlotStatusRequest>,
    ) -> Result<Json<ApiResponse<PlotEntity>>, AppError> {
        to_json(
            state
                .inventory_service
                .update_plot_status(user.actor(), id, payload)
                .await,
        )
    }
}
