use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::banner_ad_entity::BannerAdEntity;

const COLUMNS: &str =
    "id, title, description, image_url, link_url, active, display_order, created_at, updated_at";

pub struct BannerAdRepository<'c> {
    conn: &'c Connection,
}

impl<'c> BannerAdRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn insert(&self, ad: &BannerAdEntity) -> Result<()> {
        self.conn.execute(
            &format!("INSERT INTO banner_ads ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"),
            params![
                ad.id,
                ad.title,
                ad.description,
                ad.image_url,
                ad.link_url,
                ad.active,
                ad.display_order,
                ad.created_at,
                ad.updated_at,
            ],
        )?;
        Ok(())
    }

    pub fn update(&self, ad: &BannerAdEntity) -> Result<()> {
        self.conn.execute(
            r"
            UPDATE banner_ads
            SET title = ?2, description = ?3, image_url = ?4, link_url = ?5,
                active = ?6, display_order = ?7, updated_at = ?8
            WHERE id = ?1
            ",
            params![
                ad.id,
                ad.title,
                ad.description,
                ad.image_url,
                ad.link_url,
                ad.active,
                ad.display_order,
                ad.updated_at,
            ],
        )?;
        Ok(())
    }

    pub fn find(&self, id: &str) -> Result<Option<BannerAdEntity>> {
        let ad = self
            .conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM banner_ads WHERE id = ?1"),
                [id],
                Self::map_row,
            )
            .optional()?;
        Ok(ad)
    }

    pub fn list(&self, active_only: bool) -> Result<Vec<BannerAdEntity>> {
        let mut stmt = self.conn.prepare(&format!(
            r"
            SELECT {COLUMNS} FROM banner_ads
            WHERE (?1 = 0 OR active = 1)
            ORDER BY display_order ASC, created_at ASC
            "
        ))?;
        let ads = stmt
            .query_map([active_only], Self::map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(ads)
    }

    pub fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.conn.execute("DELETE FROM banner_ads WHERE id = ?1", [id])? > 0)
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<BannerAdEntity> {
        Ok(BannerAdEntity {
            id: row.get("id")?,
            title: row.get("title")?,
            description: row.get("description")?,
            image_url: row.get("image_url")?,
            link_url: row.get("link_url")?,
            active: row.get("active")?,
            display_order: row.get("display_order")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}
