use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OfficeUpsertRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[validate(length(min = 1, max = 500))]
    pub address: String,

    #[validate(length(min = 1, max = 100))]
    pub city: String,

    #[validate(length(max = 30))]
    pub phone: Option<String>,

    #[validate(email)]
    pub email: Option<String>,
}
