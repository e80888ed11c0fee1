use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::core::persistence::impl_sql_code;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VisitStatus {
    Pending,
    Approved,
    Rejected,
    /// Approved pass whose visit day has ended.
    Expired,
}

impl VisitStatus {
    pub const ALL: [VisitStatus; 4] = [
        Self::Pending,
        Self::Approved,
        Self::Rejected,
        Self::Expired,
    ];

    pub fn from_code<S: AsRef<str>>(code: S) -> Option<Self> {
        match code.as_ref().to_uppercase().as_str() {
            "PENDING" => Some(Self::Pending),
            "APPROVED" => Some(Self::Approved),
            "REJECTED" => Some(Self::Rejected),
            "EXPIRED" => Some(Self::Expired),
            _ => None,
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::Expired => "EXPIRED",
        }
    }
}

impl_sql_code!(VisitStatus);

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VisitRequestEntity {
    pub id: String,
    pub user_id: String,
    pub plot_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub visit_date: NaiveDate,
    /// Free-form `HH:MM` slot picked by the client.
    pub visit_time: Option<String>,
    pub message: Option<String>,
    pub status: VisitStatus,
    pub qr_token: Option<String>,
    /// `data:image/svg+xml;base64,...` pass rendered on approval.
    pub qr_code: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub reviewed_by: Option<String>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VisitRequestEntity {
    /// A pass admits its holder while approved and not past `expires_at`.
    pub fn pass_is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.status == VisitStatus::Approved && self.expires_at.is_some_and(|exp| now <= exp)
    }
}
