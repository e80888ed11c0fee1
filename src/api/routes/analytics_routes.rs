use axum::{routing::get, Router};

use crate::api::controller::analytics::AnalyticsController;
use crate::app_state::AppState;

pub fn analytics_routes() -> Router<AppState> {
    Router::new().route("/sales", get(AnalyticsController::get_sales_report))
}
