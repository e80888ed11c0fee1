//! Shared domain types (acting user, review outcome).

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::persistence::user::user_entity::Role;
use crate::errors::forbidden;

/// The signed-in user on whose behalf a service call runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: String,
    pub role: Role,
}

impl Actor {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }

    pub fn require(&self, roles: &[Role]) -> anyhow::Result<()> {
        if roles.contains(&self.role) {
            Ok(())
        } else {
            Err(forbidden(format!(
                "role {} may not perform this action",
                self.role.as_code()
            )))
        }
    }

    pub fn require_staff(&self) -> anyhow::Result<()> {
        self.require(Role::STAFF)
    }

    pub fn require_admin(&self) -> anyhow::Result<()> {
        self.require(&[Role::Admin])
    }

    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Staff see everything; everyone else only what they own.
    pub fn can_access(&self, owner_id: &str) -> bool {
        self.is_staff() || self.id == owner_id
    }

    pub fn ensure_access(&self, owner_id: &str) -> anyhow::Result<()> {
        if self.can_access(owner_id) {
            Ok(())
        } else {
            Err(forbidden("not the owner of this resource"))
        }
    }

    /// `Some(id)` when listings must be limited to the caller's own rows.
    pub fn owner_scope(&self) -> Option<&str> {
        (!self.is_staff()).then_some(self.id.as_str())
    }
}

/// Body of a reject action on any reviewable request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ReviewRejectRequest {
    #[validate(length(max = 500))]
    pub reason: Option<String>,
}
