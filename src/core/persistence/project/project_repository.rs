use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::project_entity::ProjectEntity;

const COLUMNS: &str = "id, name, description, location, city, image_url, created_at, updated_at";

#[derive(Debug, Default, Clone)]
pub struct ProjectFilter {
    pub city: Option<String>,
    pub search: Option<String>,
}

pub struct ProjectRepository<'c> {
    conn: &'c Connection,
}

impl<'c> ProjectRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn insert(&self, project: &ProjectEntity) -> Result<()> {
        self.conn.execute(
            &format!("INSERT INTO projects ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"),
            params![
                project.id,
                project.name,
                project.description,
                project.location,
                project.city,
                project.image_url,
                project.created_at,
                project.updated_at,
            ],
        )?;
        Ok(())
    }

    pub fn update(&self, project: &ProjectEntity) -> Result<()> {
        self.conn.execute(
            r"
            UPDATE projects
            SET name = ?2, description = ?3, location = ?4, city = ?5, image_url = ?6, updated_at = ?7
            WHERE id = ?1
            ",
            params![
                project.id,
                project.name,
                project.description,
                project.location,
                project.city,
                project.image_url,
                project.updated_at,
            ],
        )?;
        Ok(())
    }

    pub fn find(&self, id: &str) -> Result<Option<ProjectEntity>> {
        let project = self
            .conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM projects WHERE id = ?1"),
                [id],
                Self::map_row,
            )
            .optional()?;
        Ok(project)
    }

    pub fn list(&self, filter: &ProjectFilter) -> Result<Vec<ProjectEntity>> {
        let city = filter
            .city
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);
        let pattern = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s.to_lowercase()));

        let mut stmt = self.conn.prepare(&format!(
            r"
            SELECT {COLUMNS} FROM projects
            WHERE (?1 IS NULL OR lower(city) = ?1)
              AND (?2 IS NULL OR lower(name) LIKE ?2 OR lower(location) LIKE ?2)
            ORDER BY created_at DESC
            "
        ))?;
        let projects = stmt
            .query_map(params![city, pattern], Self::map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(projects)
    }

    pub fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.conn.execute("DELETE FROM projects WHERE id = ?1", [id])? > 0)
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<ProjectEntity> {
        Ok(ProjectEntity {
            id: row.get("id")?,
            name: row.get("name")?,
            description: row.get("description")?,
            location: row.get("location")?,
            city: row.get("city")?,
            image_url: row.get("image_url")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}
