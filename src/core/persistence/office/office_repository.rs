use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::office_entity::OfficeEntity;

const COLUMNS: &str = "id, name, address, city, phone, email, created_at, updated_at";

pub struct OfficeRepository<'c> {
    conn: &'c Connection,
}

impl<'c> OfficeRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn insert(&self, office: &OfficeEntity) -> Result<()> {
        self.conn.execute(
            &format!("INSERT INTO offices ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"),
            params![
                office.id,
                office.name,
                office.address,
                office.city,
                office.phone,
                office.email,
                office.created_at,
                office.updated_at,
            ],
        )?;
        Ok(())
    }

    pub fn update(&self, office: &OfficeEntity) -> Result<()> {
        self.conn.execute(
            r"
            UPDATE offices
            SET name = ?2, address = ?3, city = ?4, phone = ?5, email = ?6, updated_at = ?7
            WHERE id = ?1
            ",
            params![
                office.id,
                office.name,
                office.address,
                office.city,
                office.phone,
                office.email,
                office.updated_at,
            ],
        )?;
        Ok(())
    }

    pub fn find(&self, id: &str) -> Result<Option<OfficeEntity>> {
        let office = self
            .conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM offices WHERE id = ?1"),
                [id],
                Self::map_row,
            )
            .optional()?;
        Ok(office)
    }

    pub fn list(&self) -> Result<Vec<OfficeEntity>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {COLUMNS} FROM offices ORDER BY city, name"))?;
        let offices = stmt
            .query_map([], Self::map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(offices)
    }

    pub fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.conn.execute("DELETE FROM offices WHERE id = ?1", [id])? > 0)
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<OfficeEntity> {
        Ok(OfficeEntity {
            id: row.get("id")?,
            name: row.get("name")?,
            address: row.get("address")?,
            city: row.get("city")?,
            phone: row.get("phone")?,
            email: row.get("email")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}
