use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::persistence::user::user_entity::Role;

/// Admin announcement; `role` narrows the audience.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NotificationBroadcastRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(min = 1, max = 2000))]
    pub message: String,

    pub role: Option<Role>,
}
