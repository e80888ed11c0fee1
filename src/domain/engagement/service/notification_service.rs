use anyhow::Result;
use serde_json::{json, Value};
use tracing::info;
use validator::Validate;

use crate::api::dto::request_dto::NotificationListQuery;
use crate::core::persistence::database::Database;
use crate::core::persistence::notification::notification_entity::{
    NotificationEntity, NotificationKind,
};
use crate::core::persistence::notification::notification_repository::NotificationRepository;
use crate::core::persistence::user::user_entity::Role;
use crate::domain::common::model::Actor;
use crate::domain::common::service::notify::notify_roles;
use crate::domain::engagement::dto::notification_broadcast_request::NotificationBroadcastRequest;
use crate::errors::not_found;

const ALL_ROLES: &[Role] = &[Role::Admin, Role::Manager, Role::Client];

pub async fn list_notifications(
    db: &Database,
    actor: Actor,
    q: NotificationListQuery,
) -> Result<Vec<NotificationEntity>> {
    db.with_conn(move |conn| {
        NotificationRepository::new(conn).list_for_user(&actor.id, q.unread_only)
    })
    .await
}

pub async fn unread_count(db: &Database, actor: Actor) -> Result<Value> {
    let count = db
        .with_conn(move |conn| NotificationRepository::new(conn).unread_count(&actor.id))
        .await?;
    Ok(json!({ "count": count }))
}

/// Someone else's notification is reported as missing.
pub async fn mark_read(db: &Database, actor: Actor, id: String) -> Result<NotificationEntity> {
    db.with_conn(move |conn| {
        let repo = NotificationRepository::new(conn);
        if !repo.mark_read(&id, &actor.id)? {
            return Err(not_found("notification", &id));
        }
        repo.find_for_user(&id, &actor.id)?
            .ok_or_else(|| not_found("notification", &id))
    })
    .await
}

pub async fn mark_all_read(db: &Database, actor: Actor) -> Result<Value> {
    let updated = db
        .with_conn(move |conn| NotificationRepository::new(conn).mark_all_read(&actor.id))
        .await?;
    Ok(json!({ "updated": updated }))
}

pub async fn delete_notification(db: &Database, actor: Actor, id: String) -> Result<Value> {
    db.with_conn(move |conn| {
        if !NotificationRepository::new(conn).delete_for_user(&id, &actor.id)? {
            return Err(not_found("notification", &id));
        }
        Ok(json!({ "deleted": true, "id": id }))
    })
    .await
}

pub async fn broadcast(
    db: &Database,
    actor: Actor,
    req: NotificationBroadcastRequest,
) -> Result<Value> {
    actor.require_admin()?;
    req.validate()?;

    let recipients = db
        .transaction(move |tx| {
            let roles = match req.role.as_ref() {
                Some(role) => std::slice::from_ref(role),
                None => ALL_ROLES,
            };
            notify_roles(tx, roles, NotificationKind::System, req.title.trim(), req.message.trim())
        })
        .await?;

    info!(recipients, by = %actor.id, "Broadcast sent");
    Ok(json!({ "recipients": recipients }))
}
