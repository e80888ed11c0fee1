use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::camera_entity::{CameraEntity, CameraStatus};

const COLUMNS: &str = "id, name, stream_url, location, status, created_at, updated_at";

pub struct CameraRepository<'c> {
    conn: &'c Connection,
}

impl<'c> CameraRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn insert(&self, camera: &CameraEntity) -> Result<()> {
        self.conn.execute(
            &format!("INSERT INTO cameras ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"),
            params![
                camera.id,
                camera.name,
                camera.stream_url,
                camera.location,
                camera.status,
                camera.created_at,
                camera.updated_at,
            ],
        )?;
        Ok(())
    }

    pub fn update(&self, camera: &CameraEntity) -> Result<()> {
        self.conn.execute(
            r"
            UPDATE cameras
            SET name = ?2, stream_url = ?3, location = ?4, status = ?5, updated_at = ?6
            WHERE id = ?1
            ",
            params![
                camera.id,
                camera.name,
                camera.stream_url,
                camera.location,
                camera.status,
                camera.updated_at,
            ],
        )?;
        Ok(())
    }

    pub fn find(&self, id: &str) -> Result<Option<CameraEntity>> {
        let camera = self
            .conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM cameras WHERE id = ?1"),
                [id],
                Self::map_row,
            )
            .optional()?;
        Ok(camera)
    }

    pub fn list(&self, status: Option<CameraStatus>) -> Result<Vec<CameraEntity>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {COLUMNS} FROM cameras WHERE (?1 IS NULL OR status = ?1) ORDER BY name"
        ))?;
        let cameras = stmt
            .query_map([status], Self::map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(cameras)
    }

    pub fn list_for_land(&self, land_id: &str) -> Result<Vec<CameraEntity>> {
        let mut stmt = self.conn.prepare(
            r"
            SELECT c.id, c.name, c.stream_url, c.location, c.status, c.created_at, c.updated_at
            FROM cameras c
            JOIN land_cameras lc ON lc.camera_id = c.id
            WHERE lc.land_id = ?1
            ORDER BY lc.assigned_at ASC
            ",
        )?;
        let cameras = stmt
            .query_map([land_id], Self::map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(cameras)
    }

    pub fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.conn.execute("DELETE FROM cameras WHERE id = ?1", [id])? > 0)
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<CameraEntity> {
        Ok(CameraEntity {
            id: row.get("id")?,
            name: row.get("name")?,
            stream_url: row.get("stream_url")?,
            location: row.get("location")?,
            status: row.get("status")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}
