use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FeedbackCreateRequest {
    #[validate(range(min = 1, max = 5))]
    pub rating: u8,

    #[validate(length(min = 1, max = 2000))]
    pub message: String,
}
