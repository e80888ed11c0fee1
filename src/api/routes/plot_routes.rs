use axum::{
    routing::{get, patch},
    Router,
};

use crate::api::controller::plot::PlotController;
use crate::app_state::AppState;

pub fn plot_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(PlotController::list_plots).post(PlotController::create_plot))
        .route(
            "/{id}",
            get(PlotController::get_plot)
                .put(PlotController::update_plot)
                .delete(PlotController::delete_plot),
        )
        .route("/{id}/status", patch(PlotController::update_plot_status))
}
