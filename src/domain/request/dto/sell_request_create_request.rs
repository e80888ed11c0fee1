use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SellRequestCreateRequest {
    #[validate(length(min = 1))]
    pub land_id: String,

    #[validate(range(min = 1))]
    pub asking_price: i64,

    #[validate(length(max = 2000))]
    pub reason: Option<String>,
}
