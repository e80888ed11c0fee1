use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::persistence::impl_sql_code;

/// Role mirrored from the identity provider's public metadata.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Manager,
    Client,
}

impl Role {
    pub const STAFF: &'static [Role] = &[Role::Admin, Role::Manager];

    pub fn from_code<S: AsRef<str>>(code: S) -> Option<Self> {
        match code.as_ref().trim().to_uppercase().as_str() {
            "ADMIN" => Some(Self::Admin),
            "MANAGER" => Some(Self::Manager),
            "CLIENT" | "USER" => Some(Self::Client),
            _ => None,
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Manager => "MANAGER",
            Self::Client => "CLIENT",
        }
    }

    pub fn is_staff(&self) -> bool {
        matches!(self, Self::Admin | Self::Manager)
    }
}

impl_sql_code!(Role);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserEntity {
    /// Identity provider user id.
    pub id: String,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub role: Role,
    /// Only managers are attached to an office.
    pub office_id: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserEntity {
    pub fn new(
        id: impl Into<String>,
        email: impl Into<String>,
        name: impl Into<String>,
        role: Role,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            email: email.into(),
            name: name.into(),
            phone: None,
            role,
            office_id: None,
            image_url: None,
            created_at: now,
            updated_at: now,
        }
    }
}
