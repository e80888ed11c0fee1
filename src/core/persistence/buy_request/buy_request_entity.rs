use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::core::persistence::request_status::RequestStatus;

/// Client interest in purchasing an available plot.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BuyRequestEntity {
    pub id: String,
    pub user_id: String,
    pub plot_id: String,
    pub offer_price: Option<i64>,
    pub message: Option<String>,
    pub status: RequestStatus,
    pub reviewed_by: Option<String>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
