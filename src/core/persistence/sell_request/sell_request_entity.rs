use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::core::persistence::request_status::RequestStatus;

/// Owner's request to sell held land back into inventory.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SellRequestEntity {
    pub id: String,
    pub user_id: String,
    pub land_id: String,
    pub asking_price: i64,
    pub reason: Option<String>,
    pub status: RequestStatus,
    pub reviewed_by: Option<String>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
