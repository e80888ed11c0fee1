use anyhow::Result;
use rusqlite::{params, Connection, Row};

use super::feedback_entity::FeedbackEntity;

pub struct FeedbackRepository<'c> {
    conn: &'c Connection,
}

impl<'c> FeedbackRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn insert(&self, feedback: &FeedbackEntity) -> Result<()> {
        self.conn.execute(
            "INSERT INTO feedback (id, user_id, rating, message, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                feedback.id,
                feedback.user_id,
                feedback.rating,
                feedback.message,
                feedback.created_at,
            ],
        )?;
        Ok(())
    }

    pub fn list(&self) -> Result<Vec<FeedbackEntity>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, rating, message, created_at FROM feedback ORDER BY created_at DESC",
        )?;
        let items = stmt
            .query_map([], Self::map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(items)
    }

    pub fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.conn.execute("DELETE FROM feedback WHERE id = ?1", [id])? > 0)
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<FeedbackEntity> {
        Ok(FeedbackEntity {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            rating: row.get("rating")?,
            message: row.get("message")?,
            created_at: row.get("created_at")?,
        })
    }
}
