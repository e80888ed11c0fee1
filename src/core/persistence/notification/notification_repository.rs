use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::notification_entity::NotificationEntity;

const COLUMNS: &str = "id, user_id, title, message, kind, read, created_at";

pub struct NotificationRepository<'c> {
    conn: &'c Connection,
}

impl<'c> NotificationRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn insert(&self, n: &NotificationEntity) -> Result<()> {
        self.conn.execute(
            &format!("INSERT INTO notifications ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"),
            params![n.id, n.user_id, n.title, n.message, n.kind, n.read, n.created_at],
        )?;
        Ok(())
    }

    /// Scoped to the owner so one user can never read another's inbox.
    pub fn find_for_user(
        &self,
        id: &str,
        user_id: &str,
    ) -> Result<Option<NotificationEntity>> {
        let found = self
            .conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM notifications WHERE id = ?1 AND user_id = ?2"),
                [id, user_id],
                Self::map_row,
            )
            .optional()?;
        Ok(found)
    }

    pub fn list_for_user(
        &self,
        user_id: &str,
        unread_only: bool,
    ) -> Result<Vec<NotificationEntity>> {
        let mut stmt = self.conn.prepare(&format!(
            r"
            SELECT {COLUMNS} FROM notifications
            WHERE user_id = ?1 AND (?2 = 0 OR read = 0)
            ORDER BY created_at DESC
            "
        ))?;
        let items = stmt
            .query_map(params![user_id, unread_only], Self::map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(items)
    }

    pub fn unread_count(&self, user_id: &str) -> Result<i64> {
        let n = self.conn.query_row(
            "SELECT COUNT(*) FROM notifications WHERE user_id = ?1 AND read = 0",
            [user_id],
            |row| row.get(0),
        )?;
        Ok(n)
    }

    pub fn mark_read(&self, id: &str, user_id: &str) -> Result<bool> {
        let n = self.conn.execute(
            "UPDATE notifications SET read = 1 WHERE id = ?1 AND user_id = ?2",
            [id, user_id],
        )?;
        Ok(n > 0)
    }

    pub fn mark_all_read(&self, user_id: &str) -> Result<usize> {
        Ok(self.conn.execute(
            "UPDATE notifications SET read = 1 WHERE user_id = ?1 AND read = 0",
            [user_id],
        )?)
    }

    pub fn delete_for_user(&self, id: &str, user_id: &str) -> Result<bool> {
        let n = self.conn.execute(
            "DELETE FROM notifications WHERE id = ?1 AND user_id = ?2",
            [id, user_id],
        )?;
        Ok(n > 0)
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<NotificationEntity> {
        Ok(NotificationEntity {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            title: row.get("title")?,
            message: row.get("message")?,
            kind: row.get("kind")?,
            read: row.get("read")?,
            created_at: row.get("created_at")?,
        })
    }
}
