use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tracing::debug;

use crate::app_state::AppState;
use crate::core::persistence::user::user_entity::{Role, UserEntity};
use crate::domain::common::model::Actor;
use crate::errors::AppError;

/// Header set by the gateway after it has verified the session.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Caller resolved from the `x-user-id` header against the local user mirror.
#[derive(Debug, Clone)]
pub struct AuthUser(pub UserEntity);

impl AuthUser {
    pub fn actor(&self) -> Actor {
        Actor::new(self.0.id.clone(), self.0.role)
    }

    pub fn require(&self, roles: &[Role]) -> Result<(), AppError> {
        self.actor().require(roles).map_err(AppError::from)
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::Unauthorized(format!("missing {USER_ID_HEADER} header")))?
            .to_string();

        match state.user_service.find_user(id.clone()).await? {
            Some(user) => Ok(AuthUser(user)),
            None => {
                debug!(user_id = %id, "Rejected request from unknown user");
                Err(AppError::Unauthorized(format!("unknown user '{id}'")))
            }
        }
    }
}
