use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedbackEntity {
    pub id: String,
    pub user_id: String,
    /// 1..=5
    pub rating: u8,
    pub message: String,
    pub created_at: DateTime<Utc>,
}
