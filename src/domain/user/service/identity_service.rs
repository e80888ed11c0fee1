//! Mirror of identity-provider users into the local `users` table.
//!
//! Users are pushed by signed webhooks (`user.created`, `user.updated`,
//! `user.deleted`) and can be pulled on demand through the provider's REST API.

use anyhow::Result;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::core::client::identity_client::{IdentityDirectory, IdentityUserPayload};
use crate::core::persistence::database::Database;
use crate::core::persistence::user::user_entity::{Role, UserEntity};
use crate::core::persistence::user::user_repository::UserRepository;
use crate::core::util::signature_util::{SignatureUtil, WebhookHeaders};
use crate::domain::common::model::Actor;
use crate::domain::user::service::user_service::remove_user;
use crate::errors::{bad_request, not_found, AppError};

#[derive(Debug, Deserialize)]
struct IdentityWebhookEvent {
    #[serde(rename = "type")]
    event_type: String,
    data: Value,
}

#[derive(Debug, Deserialize)]
struct DeletedUser {
    id: Option<String>,
}

/// Translate a provider profile into the local user shape.
pub fn map_identity_user(payload: &IdentityUserPayload) -> Result<UserEntity> {
    let primary = payload.primary_email_address_id.as_deref().and_then(|primary| {
        payload
            .email_addresses
            .iter()
            .find(|e| e.id.as_deref() == Some(primary))
    });
    let email = primary
        .or_else(|| payload.email_addresses.first())
        .map(|e| e.email_address.trim().to_string())
        .filter(|e| !e.is_empty())
        .ok_or_else(|| bad_request(format!("identity user '{}' has no email", payload.id)))?;

    let name = [payload.first_name.as_deref(), payload.last_name.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    let name = if name.is_empty() { email.clone() } else { name };

    let role = payload
        .public_metadata
        .get("role")
        .and_then(Value::as_str)
        .and_then(Role::from_code)
        .unwrap_or(Role::Client);

    let mut user = UserEntity::new(payload.id.clone(), email, name, role);
    user.phone = payload.phone_numbers.first().map(|p| p.phone_number.clone());
    user.image_url = payload.image_url.clone();
    Ok(user)
}

async fn store_identity_user(db: &Database, payload: &IdentityUserPayload) -> Result<UserEntity> {
    let user = map_identity_user(payload)?;
    let id = user.id.clone();
    db.with_conn(move |conn| {
        let repo = UserRepository::new(conn);
        repo.upsert(&user)?;
        repo.find(&id)?.ok_or_else(|| not_found("user", &id))
    })
    .await
}

/// Pull one profile from the provider and refresh the mirror.
pub async fn sync_user(
    db: &Database,
    directory: &dyn IdentityDirectory,
    actor: Actor,
    id: String,
) -> Result<UserEntity> {
    actor.require_admin()?;

    let payload = directory
        .fetch_user(&id)
        .await?
        .ok_or_else(|| not_found("identity user", &id))?;
    let user = store_identity_user(db, &payload).await?;

    info!(user_id = %user.id, role = user.role.as_code(), "User synced from identity provider");
    Ok(user)
}

/// Verify and apply an identity webhook delivery.
pub async fn handle_identity_webhook(
    db: &Database,
    secret: Option<&str>,
    headers: WebhookHeaders<'_>,
    body: &[u8],
) -> Result<Value> {
    let Some(secret) = secret else {
        return Err(AppError::ServiceUnavailable("webhook secret is not configured".into()).into());
    };
    if !SignatureUtil::verify(secret, &headers, body, Utc::now().timestamp())? {
        warn!(webhook_id = headers.id, "Rejected identity webhook signature");
        return Err(AppError::Unauthorized("invalid webhook signature".into()).into());
    }

    let event: IdentityWebhookEvent = serde_json::from_slice(body)
        .map_err(|e| bad_request(format!("malformed webhook payload: {e}")))?;

    match event.event_type.as_str() {
        "user.created" | "user.updated" => {
            let payload: IdentityUserPayload = serde_json::from_value(event.data)
                .map_err(|e| bad_request(format!("malformed user payload: {e}")))?;
            let user = store_identity_user(db, &payload).await?;
            info!(user_id = %user.id, event = %event.event_type, "Identity user mirrored");
            Ok(json!({ "event": event.event_type, "user_id": user.id }))
        }
        "user.deleted" => {
            let deleted: DeletedUser = serde_json::from_value(event.data)
                .map_err(|e| bad_request(format!("malformed user payload: {e}")))?;
            let id = deleted
                .id
                .ok_or_else(|| bad_request("user.deleted without id"))?;
            let user_id = id.clone();
            let removed = db
                .transaction(move |tx| remove_user(tx, &id))
                .await?
                .is_some();
            info!(%user_id, removed, "Identity user deleted");
            Ok(json!({ "event": event.event_type, "user_id": user_id, "removed": removed }))
        }
        other => {
            info!(event = other, "Ignoring identity webhook event");
            Ok(json!({ "event": other, "ignored": true }))
        }
    }
}
