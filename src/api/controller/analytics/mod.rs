use axum::extract::{Query, State};
use axum::Json;

use crate::api::auth::AuthUser;
use crate::api::dto::request_dto::SalesQuery;
use crate::api::dto::ApiResponse;
use crate::api::util::json::to_json;
use crate::app_state::AppState;
use crate::domain::analytics::service::sales_service::SalesReport;
use crate::errors::AppError;

pub struct AnalyticsController;

impl AnalyticsController {
    pub async fn get_sales_report(
        State(state): State<AppState>,
        user: AuthUser,
        Query(query): Query<SalesQuery>,
    ) -> Result<Json<ApiResponse<SalesReport>>, AppError> {
        to_json(state.analytics_service.get_sales_report(user.actor(), query).await)
    }
}
