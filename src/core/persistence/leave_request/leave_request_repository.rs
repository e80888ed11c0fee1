use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::leave_request_entity::LeaveRequestEntity;
use crate::core::persistence::request_status::RequestStatus;

const COLUMNS: &str =
    "id, manager_id, start_date, end_date, reason, status, reviewed_by, created_at, updated_at";

pub struct LeaveRequestRepository<'c> {
    conn: &'c Connection,
}

impl<'c> LeaveRequestRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn insert(&self, leave: &LeaveRequestEntity) -> Result<()> {
        self.conn.execute(
            &format!(
                "INSERT INTO leave_requests ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
            ),
            params![
                leave.id,
                leave.manager_id,
                leave.start_date,
                leave.end_date,
                leave.reason,
                leave.status,
                leave.reviewed_by,
                leave.created_at,
                leave.updated_at,
            ],
        )?;
        Ok(())
    }

    pub fn update_review(&self, leave: &LeaveRequestEntity) -> Result<()> {
        self.conn.execute(
            "UPDATE leave_requests SET status = ?2, reviewed_by = ?3, updated_at = ?4 WHERE id = ?1",
            params![leave.id, leave.status, leave.reviewed_by, leave.updated_at],
        )?;
        Ok(())
    }

    pub fn find(&self, id: &str) -> Result<Option<LeaveRequestEntity>> {
        let leave = self
            .conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM leave_requests WHERE id = ?1"),
                [id],
                Self::map_row,
            )
            .optional()?;
        Ok(leave)
    }

    pub fn list(
        &self,
        manager_id: Option<&str>,
        status: Option<RequestStatus>,
    ) -> Result<Vec<LeaveRequestEntity>> {
        let mut stmt = self.conn.prepare(&format!(
            r"
            SELECT {COLUMNS} FROM leave_requests
            WHERE (?1 IS NULL OR manager_id = ?1) AND (?2 IS NULL OR status = ?2)
            ORDER BY start_date DESC
            "
        ))?;
        let items = stmt
            .query_map(params![manager_id, status], Self::map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(items)
    }

    pub fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.conn.execute("DELETE FROM leave_requests WHERE id = ?1", [id])? > 0)
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<LeaveRequestEntity> {
        Ok(LeaveRequestEntity {
            id: row.get("id")?,
            manager_id: row.get("manager_id")?,
            start_date: row.get("start_date")?,
            end_date: row.get("end_date")?,
            reason: row.get("reason")?,
            status: row.get("status")?,
            reviewed_by: row.get("reviewed_by")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}
