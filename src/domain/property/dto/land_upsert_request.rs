use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LandUpsertRequest {
    #[validate(length(min = 1))]
    pub owner_id: String,

    pub plot_id: Option<String>,

    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[validate(range(exclusive_min = 0.0))]
    pub area_sq_yards: f64,

    #[validate(length(min = 1, max = 300))]
    pub location: String,
}
