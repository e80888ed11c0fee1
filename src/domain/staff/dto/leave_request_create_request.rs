use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LeaveRequestCreateRequest {
    pub start_date: NaiveDate,

    /// Inclusive.
    pub end_date: NaiveDate,

    #[validate(length(min = 1, max = 1000))]
    pub reason: String,
}
