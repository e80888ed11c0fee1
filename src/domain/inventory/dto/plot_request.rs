use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::persistence::plot::plot_entity::PlotStatus;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PlotCreateRequest {
    #[validate(length(min = 1))]
    pub project_id: String,

    #[validate(length(min = 1, max = 50))]
    pub plot_number: String,

    #[validate(length(max = 200))]
    pub title: Option<String>,

    #[validate(range(exclusive_min = 0.0))]
    pub area_sq_yards: f64,

    #[validate(range(min = 1))]
    pub price: i64,

    #[validate(length(max = 50))]
    pub facing: Option<String>,

    #[validate(url)]
    pub image_url: Option<String>,
}

/// Detail edit; the status only moves through [`PlotStatusRequest`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PlotUpdateRequest {
    #[validate(length(min = 1, max = 50))]
    pub plot_number: Option<String>,

    #[validate(length(max = 200))]
    pub title: Option<String>,

    #[validate(range(exclusive_min = 0.0))]
    pub area_sq_yards: Option<f64>,

    #[validate(range(min = 1))]
    pub price: Option<i64>,

    #[validate(length(max = 50))]
    pub facing: Option<String>,

    #[validate(url)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PlotStatusRequest {
    pub status: PlotStatus,
    pub owner_id: Option<String>,
}
