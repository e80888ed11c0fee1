use serde::{Deserialize, Serialize};
use validator::Validate;

/// Create/replace payload for a project.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProjectUpsertRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[validate(length(max = 5000))]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 300))]
    pub location: String,

    #[validate(length(min = 1, max = 100))]
    pub city: String,

    #[validate(url)]
    pub image_url: Option<String>,
}
