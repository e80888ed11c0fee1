use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::persistence::impl_sql_code;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    Info,
    Visit,
    Buy,
    Sell,
    Leave,
    System,
}

impl NotificationKind {
    pub fn from_code<S: AsRef<str>>(code: S) -> Option<Self> {
        match code.as_ref().to_uppercase().as_str() {
            "INFO" => Some(Self::Info),
            "VISIT" => Some(Self::Visit),
            "BUY" => Some(Self::Buy),
            "SELL" => Some(Self::Sell),
            "LEAVE" => Some(Self::Leave),
            "SYSTEM" => Some(Self::System),
            _ => None,
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Visit => "VISIT",
            Self::Buy => "BUY",
            Self::Sell => "SELL",
            Self::Leave => "LEAVE",
            Self::System => "SYSTEM",
        }
    }
}

impl_sql_code!(NotificationKind);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationEntity {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl NotificationEntity {
    pub fn new(
        user_id: impl Into<String>,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            title: title.into(),
            message: message.into(),
            kind,
            read: false,
            created_at: Utc::now(),
        }
    }
}
