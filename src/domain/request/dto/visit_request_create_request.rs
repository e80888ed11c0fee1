use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Site visit booking submitted by a signed-in user.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VisitRequestCreateRequest {
    #[validate(length(min = 1))]
    pub plot_id: String,

    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 5, max = 30))]
    pub phone: String,

    pub visit_date: NaiveDate,

    /// `HH:MM`
    #[validate(length(min = 4, max = 5))]
    pub visit_time: Option<String>,

    #[validate(length(max = 2000))]
    pub message: Option<String>,
}
