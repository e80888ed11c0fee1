use std::collections::HashMap;

use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::buy_request_entity::BuyRequestEntity;
use crate::core::persistence::request_status::RequestStatus;

const COLUMNS: &str = "id, user_id, plot_id, offer_price, message, status, reviewed_by, rejection_reason, created_at, updated_at";

pub struct BuyRequestRepository<'c> {
    conn: &'c Connection,
}

impl<'c> BuyRequestRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn insert(&self, req: &BuyRequestEntity) -> Result<()> {
        self.conn.execute(
            &format!(
                "INSERT INTO buy_requests ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
            ),
            params![
                req.id,
                req.user_id,
                req.plot_id,
                req.offer_price,
                req.message,
                req.status,
                req.reviewed_by,
                req.rejection_reason,
                req.created_at,
                req.updated_at,
            ],
        )?;
        Ok(())
    }

    pub fn update_review(&self, req: &BuyRequestEntity) -> Result<()> {
        self.conn.execute(
            r"
            UPDATE buy_requests
            SET status = ?2, reviewed_by = ?3, rejection_reason = ?4, updated_at = ?5
            WHERE id = ?1
            ",
            params![
                req.id,
                req.status,
                req.reviewed_by,
                req.rejection_reason,
                req.updated_at,
            ],
        )?;
        Ok(())
    }

    pub fn find(&self, id: &str) -> Result<Option<BuyRequestEntity>> {
        let req = self
            .conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM buy_requests WHERE id = ?1"),
                [id],
                Self::map_row,
            )
            .optional()?;
        Ok(req)
    }

    pub fn list(
        &self,
        user_id: Option<&str>,
        status: Option<RequestStatus>,
    ) -> Result<Vec<BuyRequestEntity>> {
        let mut stmt = self.conn.prepare(&format!(
            r"
            SELECT {COLUMNS} FROM buy_requests
            WHERE (?1 IS NULL OR user_id = ?1) AND (?2 IS NULL OR status = ?2)
            ORDER BY created_at DESC
            "
        ))?;
        let reqs = stmt
            .query_map(params![user_id, status], Self::map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(reqs)
    }

    pub fn list_pending_for_plot(&self, plot_id: &str) -> Result<Vec<BuyRequestEntity>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {COLUMNS} FROM buy_requests WHERE plot_id = ?1 AND status = ?2 ORDER BY created_at ASC"
        ))?;
        let reqs = stmt
            .query_map(params![plot_id, RequestStatus::Pending], Self::map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(reqs)
    }

    pub fn has_pending(&self, user_id: &str, plot_id: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM buy_requests WHERE user_id = ?1 AND plot_id = ?2 AND status = ?3",
            params![user_id, plot_id, RequestStatus::Pending],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    pub fn count_by_status(&self) -> Result<HashMap<RequestStatus, i64>> {
        let mut stmt = self
            .conn
            .prepare("SELECT status, COUNT(*) FROM buy_requests GROUP BY status")?;
        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, RequestStatus>(0)?, row.get::<_, i64>(1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows.into_iter().collect())
    }

    pub fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.conn.execute("DELETE FROM buy_requests WHERE id = ?1", [id])? > 0)
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<BuyRequestEntity> {
        Ok(BuyRequestEntity {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            plot_id: row.get("plot_id")?,
            offer_price: row.get("offer_price")?,
            message: row.get("message")?,
            status: row.get("status")?,
            reviewed_by: row.get("reviewed_by")?,
            rejection_reason: row.get("rejection_reason")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}
