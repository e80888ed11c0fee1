use anyhow::Result;
use rusqlite::Connection;
use tracing::debug;

use crate::core::persistence::notification::notification_entity::{
    NotificationEntity, NotificationKind,
};
use crate::core::persistence::notification::notification_repository::NotificationRepository;
use crate::core::persistence::user::user_entity::Role;
use crate::core::persistence::user::user_repository::UserRepository;

/// Drop a notification into one user's inbox.
pub fn notify_user(
    conn: &Connection,
    user_id: &str,
    kind: NotificationKind,
    title: &str,
    message: &str,
) -> Result<()> {
    let n = NotificationEntity::new(user_id, kind, title, message);
    NotificationRepository::new(conn).insert(&n)?;
    debug!(user_id, kind = kind.as_code(), "Notification queued");
    Ok(())
}

/// Notify every admin and manager; returns the number of recipients.
pub fn notify_staff(
    conn: &Connection,
    kind: NotificationKind,
    title: &str,
    message: &str,
) -> Result<usize> {
    notify_roles(conn, Role::STAFF, kind, title, message)
}

pub fn notify_roles(
    conn: &Connection,
    roles: &[Role],
    kind: NotificationKind,
    title: &str,
    message: &str,
) -> Result<usize> {
    let recipients = UserRepository::new(conn).list_by_roles(roles)?;
    for user in &recipients {
        notify_user(conn, &user.id, kind, title, message)?;
    }
    Ok(recipients.len())
}
