use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BannerAdUpsertRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    #[validate(url)]
    pub image_url: String,

    #[validate(url)]
    pub link_url: Option<String>,

    pub active: Option<bool>,

    pub display_order: Option<i64>,
}
