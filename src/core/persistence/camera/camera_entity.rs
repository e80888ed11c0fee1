use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::persistence::impl_sql_code;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CameraStatus {
    Active,
    Inactive,
}

impl CameraStatus {
    pub fn from_code<S: AsRef<str>>(code: S) -> Option<Self> {
        match code.as_ref().to_uppercase().as_str() {
            "ACTIVE" => Some(Self::Active),
            "INACTIVE" => Some(Self::Inactive),
            _ => None,
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
        }
    }
}

impl_sql_code!(CameraStatus);

/// Site surveillance camera that can be assigned to one land.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CameraEntity {
    pub id: String,
    pub name: String,
    pub stream_url: String,
    pub location: Option<String>,
    pub status: CameraStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
