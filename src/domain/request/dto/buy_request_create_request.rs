use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BuyRequestCreateRequest {
    #[validate(length(min = 1))]
    pub plot_id: String,

    #[validate(range(min = 1))]
    pub offer_price: Option<i64>,

    #[validate(length(max = 2000))]
    pub message: Option<String>,
}
