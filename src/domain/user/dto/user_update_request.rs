use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use validator::Validate;

use crate::core::persistence::user::user_entity::Role;

/// Self-service profile edit (`PATCH /users/me`).
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UserProfileUpdateRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,

    #[validate(length(max = 30))]
    pub phone: Option<String>,
}

/// Admin edit of role and office assignment.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UserAdminUpdateRequest {
    pub role: Option<Role>,

    /// Absent leaves the office alone, `null` clears it.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub office_id: Option<Option<String>>,
}
