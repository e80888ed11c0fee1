use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::land_camera_entity::LandCameraEntity;

pub struct LandCameraRepository<'c> {
    conn: &'c Connection,
}

impl<'c> LandCameraRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn insert(&self, assignment: &LandCameraEntity) -> Result<()> {
        self.conn.execute(
            "INSERT INTO land_cameras (land_id, camera_id, assigned_by, assigned_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                assignment.land_id,
                assignment.camera_id,
                assignment.assigned_by,
                assignment.assigned_at,
            ],
        )?;
        Ok(())
    }

    /// Current assignment of a camera, wherever it is.
    pub fn find_by_camera(&self, camera_id: &str) -> Result<Option<LandCameraEntity>> {
        let found = self
            .conn
            .query_row(
                "SELECT land_id, camera_id, assigned_by, assigned_at FROM land_cameras WHERE camera_id = ?1",
                [camera_id],
                Self::map_row,
            )
            .optional()?;
        Ok(found)
    }

    pub fn delete(&self, land_id: &str, camera_id: &str) -> Result<bool> {
        let n = self.conn.execute(
            "DELETE FROM land_cameras WHERE land_id = ?1 AND camera_id = ?2",
            [land_id, camera_id],
        )?;
        Ok(n > 0)
    }

    pub fn delete_for_land(&self, land_id: &str) -> Result<usize> {
        Ok(self
            .conn
            .execute("DELETE FROM land_cameras WHERE land_id = ?1", [land_id])?)
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<LandCameraEntity> {
        Ok(LandCameraEntity {
            land_id: row.get("land_id")?,
            camera_id: row.get("camera_id")?,
            assigned_by: row.get("assigned_by")?,
            assigned_at: row.get("assigned_at")?,
        })
    }
}
