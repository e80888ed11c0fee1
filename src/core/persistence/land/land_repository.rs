use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::land_entity::LandEntity;

const COLUMNS: &str = "id, owner_id, plot_id, name, area_sq_yards, location, created_at, updated_at";

pub struct LandRepository<'c> {
    conn: &'c Connection,
}

impl<'c> LandRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn insert(&self, land: &LandEntity) -> Result<()> {
        self.conn.execute(
            &format!("INSERT INTO lands ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"),
            params![
                land.id,
                land.owner_id,
                land.plot_id,
                land.name,
                land.area_sq_yards,
                land.location,
                land.created_at,
                land.updated_at,
            ],
        )?;
        Ok(())
    }

    pub fn update(&self, land: &LandEntity) -> Result<()> {
        self.conn.execute(
            r"
            UPDATE lands
            SET owner_id = ?2, plot_id = ?3, name = ?4, area_sq_yards = ?5, location = ?6, updated_at = ?7
            WHERE id = ?1
            ",
            params![
                land.id,
                land.owner_id,
                land.plot_id,
                land.name,
                land.area_sq_yards,
                land.location,
                land.updated_at,
            ],
        )?;
        Ok(())
    }

    pub fn find(&self, id: &str) -> Result<Option<LandEntity>> {
        let land = self
            .conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM lands WHERE id = ?1"),
                [id],
                Self::map_row,
            )
            .optional()?;
        Ok(land)
    }

    /// All lands, or only those of `owner_id`.
    pub fn list(&self, owner_id: Option<&str>) -> Result<Vec<LandEntity>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {COLUMNS} FROM lands WHERE (?1 IS NULL OR owner_id = ?1) ORDER BY created_at DESC"
        ))?;
        let lands = stmt
            .query_map([owner_id], Self::map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(lands)
    }

    /// Camera assignments go with the land through `ON DELETE CASCADE`.
    pub fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.conn.execute("DELETE FROM lands WHERE id = ?1", [id])? > 0)
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<LandEntity> {
        Ok(LandEntity {
            id: row.get("id")?,
            owner_id: row.get("owner_id")?,
            plot_id: row.get("plot_id")?,
            name: row.get("name")?,
            area_sq_yards: row.get("area_sq_yards")?,
            location: row.get("location")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}
