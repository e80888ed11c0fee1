use std::collections::HashMap;

use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::sell_request_entity::SellRequestEntity;
use crate::core::persistence::request_status::RequestStatus;

const COLUMNS: &str = "id, user_id, land_id, asking_price, reason, status, reviewed_by, rejection_reason, created_at, updated_at";

pub struct SellRequestRepository<'c> {
    conn: &'c Connection,
}

impl<'c> SellRequestRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn insert(&self, req: &SellRequestEntity) -> Result<()> {
        self.conn.execute(
            &format!(
                "INSERT INTO sell_requests ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
            ),
            params![
                req.id,
                req.user_id,
                req.land_id,
                req.asking_price,
                req.reason,
                req.status,
                req.reviewed_by,
                req.rejection_reason,
                req.created_at,
                req.updated_at,
            ],
        )?;
        Ok(())
    }

    pub fn update_review(&self, req: &SellRequestEntity) -> Result<()> {
        self.conn.execute(
            r"
            UPDATE sell_requests
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

    pub fn find(&self, id: &str) -> Result<Option<SellRequestEntity>> {
        let req = self
            .conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM sell_requests WHERE id = ?1"),
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
    ) -> Result<Vec<SellRequestEntity>> {
        let mut stmt = self.conn.prepare(&format!(
            r"
            SELECT {COLUMNS} FROM sell_requests
            WHERE (?1 IS NULL OR user_id = ?1) AND (?2 IS NULL OR status = ?2)
            ORDER BY created_at DESC
            "
        ))?;
        let reqs = stmt
            .query_map(params![user_id, status], Self::map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(reqs)
    }

    pub fn has_pending_for_land(&self, land_id: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sell_requests WHERE land_id = ?1 AND status = ?2",
            params![land_id, RequestStatus::Pending],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Close open requests for a land that no longer exists.
    pub fn reject_pending_for_land(
        &self,
        land_id: &str,
        reason: &str,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<usize> {
        let n = self.conn.execute(
            r"
            UPDATE sell_requests
            SET status = ?2, rejection_reason = ?3, updated_at = ?4
            WHERE land_id = ?1 AND status = ?5
            ",
            params![
                land_id,
                RequestStatus::Rejected,
                reason,
                now,
                RequestStatus::Pending
            ],
        )?;
        Ok(n)
    }

    pub fn count_by_status(&self) -> Result<HashMap<RequestStatus, i64>> {
        let mut stmt = self
            .conn
            .prepare("SELECT status, COUNT(*) FROM sell_requests GROUP BY status")?;
        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, RequestStatus>(0)?, row.get::<_, i64>(1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows.into_iter().collect())
    }

    pub fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.conn.execute("DELETE FROM sell_requests WHERE id = ?1", [id])? > 0)
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<SellRequestEntity> {
        Ok(SellRequestEntity {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            land_id: row.get("land_id")?,
            asking_price: row.get("asking_price")?,
            reason: row.get("reason")?,
            status: row.get("status")?,
            reviewed_by: row.get("reviewed_by")?,
            rejection_reason: row.get("rejection_reason")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}
