use std::collections::HashMap;

use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::plot_entity::{PlotEntity, PlotStatus};

const COLUMNS: &str = "id, project_id, plot_number, title, area_sq_yards, price, facing, status, owner_id, image_url, sold_at, created_at, updated_at";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlotSort {
    PriceAsc,
    PriceDesc,
    #[default]
    Newest,
}

impl PlotSort {
    pub fn from_code<S: AsRef<str>>(code: S) -> Option<Self> {
        match code.as_ref().to_lowercase().as_str() {
            "price_asc" => Some(Self::PriceAsc),
            "price_desc" => Some(Self::PriceDesc),
            "newest" => Some(Self::Newest),
            _ => None,
        }
    }

    fn order_by(&self) -> &'static str {
        match self {
            Self::PriceAsc => "price ASC, plot_number ASC",
            Self::PriceDesc => "price DESC, plot_number ASC",
            Self::Newest => "created_at DESC, plot_number ASC",
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct PlotFilter {
    pub project_id: Option<String>,
    pub status: Option<PlotStatus>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub sort: PlotSort,
    pub limit: usize,
    pub offset: usize,
}

pub struct PlotRepository<'c> {
    conn: &'c Connection,
}

impl<'c> PlotRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn insert(&self, plot: &PlotEntity) -> Result<()> {
        self.conn.execute(
            &format!(
                "INSERT INTO plots ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)"
            ),
            params![
                plot.id,
                plot.project_id,
                plot.plot_number,
                plot.title,
                plot.area_sq_yards,
                plot.price,
                plot.facing,
                plot.status,
                plot.owner_id,
                plot.image_url,
                plot.sold_at,
                plot.created_at,
                plot.updated_at,
            ],
        )?;
        Ok(())
    }

    pub fn update(&self, plot: &PlotEntity) -> Result<()> {
        self.conn.execute(
            r"
            UPDATE plots
            SET plot_number = ?2, title = ?3, area_sq_yards = ?4, price = ?5, facing = ?6,
                status = ?7, owner_id = ?8, image_url = ?9, sold_at = ?10, updated_at = ?11
            WHERE id = ?1
            ",
            params![
                plot.id,
                plot.plot_number,
                plot.title,
                plot.area_sq_yards,
                plot.price,
                plot.facing,
                plot.status,
                plot.owner_id,
                plot.image_url,
                plot.sold_at,
                plot.updated_at,
            ],
        )?;
        Ok(())
    }

    pub fn find(&self, id: &str) -> Result<Option<PlotEntity>> {
        let plot = self
            .conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM plots WHERE id = ?1"),
                [id],
                Self::map_row,
            )
            .optional()?;
        Ok(plot)
    }

    pub fn exists_number(
        &self,
        project_id: &str,
        plot_number: &str,
        except_id: Option<&str>,
    ) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            r"
            SELECT COUNT(*) FROM plots
            WHERE project_id = ?1 AND plot_number = ?2 AND (?3 IS NULL OR id != ?3)
            ",
            params![project_id, plot_number, except_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    pub fn list(&self, filter: &PlotFilter) -> Result<(Vec<PlotEntity>, usize)> {
        let where_clause = r"
            WHERE (?1 IS NULL OR project_id = ?1)
              AND (?2 IS NULL OR status = ?2)
              AND (?3 IS NULL OR price >= ?3)
              AND (?4 IS NULL OR price <= ?4)
        ";
        let total: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM plots {where_clause}"),
            params![
                filter.project_id,
                filter.status,
                filter.min_price,
                filter.max_price
            ],
            |row| row.get(0),
        )?;

        let mut stmt = self.conn.prepare(&format!(
            "SELECT {COLUMNS} FROM plots {where_clause} ORDER BY {} LIMIT ?5 OFFSET ?6",
            filter.sort.order_by()
        ))?;
        let plots = stmt
            .query_map(
                params![
                    filter.project_id,
                    filter.status,
                    filter.min_price,
                    filter.max_price,
                    filter.limit as i64,
                    filter.offset as i64,
                ],
                Self::map_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((plots, total as usize))
    }

    pub fn list_all(&self) -> Result<Vec<PlotEntity>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {COLUMNS} FROM plots ORDER BY created_at ASC"))?;
        let plots = stmt
            .query_map([], Self::map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(plots)
    }

    pub fn list_by_owner(&self, owner_id: &str) -> Result<Vec<PlotEntity>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {COLUMNS} FROM plots WHERE owner_id = ?1 ORDER BY created_at ASC"
        ))?;
        let plots = stmt
            .query_map([owner_id], Self::map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(plots)
    }

    pub fn count_by_status(&self, project_id: &str) -> Result<HashMap<PlotStatus, i64>> {
        let mut stmt = self.conn.prepare(
            "SELECT status, COUNT(*) FROM plots WHERE project_id = ?1 GROUP BY status",
        )?;
        let rows = stmt
            .query_map([project_id], |row| {
                Ok((row.get::<_, PlotStatus>(0)?, row.get::<_, i64>(1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows.into_iter().collect())
    }

    pub fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.conn.execute("DELETE FROM plots WHERE id = ?1", [id])? > 0)
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<PlotEntity> {
        Ok(PlotEntity {
            id: row.get("id")?,
            project_id: row.get("project_id")?,
            plot_number: row.get("plot_number")?,
            title: row.get("title")?,
            area_sq_yards: row.get("area_sq_yards")?,
            price: row.get("price")?,
            facing: row.get("facing")?,
            status: row.get("status")?,
            owner_id: row.get("owner_id")?,
            image_url: row.get("image_url")?,
            sold_at: row.get("sold_at")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}
