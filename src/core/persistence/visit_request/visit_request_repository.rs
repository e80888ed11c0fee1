use std::collections::HashMap;

use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::visit_request_entity::{VisitRequestEntity, VisitStatus};

const COLUMNS: &str = "id, user_id, plot_id, name, email, phone, visit_date, visit_time, message, status, qr_token, qr_code, expires_at, reviewed_by, rejection_reason, created_at, updated_at";

pub struct VisitRequestRepository<'c> {
    conn: &'c Connection,
}

impl<'c> VisitRequestRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn insert(&self, visit: &VisitRequestEntity) -> Result<()> {
        self.conn.execute(
            &format!(
                "INSERT INTO visit_requests ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)"
            ),
            params![
                visit.id,
                visit.user_id,
                visit.plot_id,
                visit.name,
                visit.email,
                visit.phone,
                visit.visit_date,
                visit.visit_time,
                visit.message,
                visit.status,
                visit.qr_token,
                visit.qr_code,
                visit.expires_at,
                visit.reviewed_by,
                visit.rejection_reason,
                visit.created_at,
                visit.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Persist the review outcome of a request.
    pub fn update_review(&self, visit: &VisitRequestEntity) -> Result<()> {
        self.conn.execute(
            r"
            UPDATE visit_requests
            SET status = ?2, qr_token = ?3, qr_code = ?4, expires_at = ?5,
                reviewed_by = ?6, rejection_reason = ?7, updated_at = ?8
            WHERE id = ?1
            ",
            params![
                visit.id,
                visit.status,
                visit.qr_token,
                visit.qr_code,
                visit.expires_at,
                visit.reviewed_by,
                visit.rejection_reason,
                visit.updated_at,
            ],
        )?;
        Ok(())
    }

    pub fn find(&self, id: &str) -> Result<Option<VisitRequestEntity>> {
        let visit = self
            .conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM visit_requests WHERE id = ?1"),
                [id],
                Self::map_row,
            )
            .optional()?;
        Ok(visit)
    }

    pub fn find_by_token(&self, token: &str) -> Result<Option<VisitRequestEntity>> {
        let visit = self
            .conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM visit_requests WHERE qr_token = ?1"),
                [token],
                Self::map_row,
            )
            .optional()?;
        Ok(visit)
    }

    pub fn list(
        &self,
        user_id: Option<&str>,
        status: Option<VisitStatus>,
    ) -> Result<Vec<VisitRequestEntity>> {
        let mut stmt = self.conn.prepare(&format!(
            r"
            SELECT {COLUMNS} FROM visit_requests
            WHERE (?1 IS NULL OR user_id = ?1) AND (?2 IS NULL OR status = ?2)
            ORDER BY created_at DESC
            "
        ))?;
        let visits = stmt
            .query_map(params![user_id, status], Self::map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(visits)
    }

    /// Flip approved passes past their expiry to `EXPIRED`; returns the count.
    pub fn expire_before(&self, now: DateTime<Utc>) -> Result<usize> {
        let n = self.conn.execute(
            r"
            UPDATE visit_requests
            SET status = ?1, updated_at = ?2
            WHERE status = ?3 AND expires_at IS NOT NULL AND expires_at < ?2
            ",
            params![VisitStatus::Expired, now, VisitStatus::Approved],
        )?;
        Ok(n)
    }

    pub fn count_by_status(&self) -> Result<HashMap<VisitStatus, i64>> {
        let mut stmt = self
            .conn
            .prepare("SELECT status, COUNT(*) FROM visit_requests GROUP BY status")?;
        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, VisitStatus>(0)?, row.get::<_, i64>(1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows.into_iter().collect())
    }

    pub fn delete(&self, id: &str) -> Result<bool> {
        Ok(self
            .conn
            .execute("DELETE FROM visit_requests WHERE id = ?1", [id])?
            > 0)
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<VisitRequestEntity> {
        Ok(VisitRequestEntity {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            plot_id: row.get("plot_id")?,
            name: row.get("name")?,
            email: row.get("email")?,
            phone: row.get("phone")?,
            visit_date: row.get("visit_date")?,
            visit_time: row.get("visit_time")?,
            message: row.get("message")?,
            status: row.get("status")?,
            qr_token: row.get("qr_token")?,
            qr_code: row.get("qr_code")?,
            expires_at: row.get("expires_at")?,
            reviewed_by: row.get("reviewed_by")?,
            rejection_reason: row.get("rejection_reason")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}
