use anyhow::Result;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::user_entity::{Role, UserEntity};

const COLUMNS: &str =
    "id, email, name, phone, role, office_id, image_url, created_at, updated_at";

#[derive(Debug, Default, Clone)]
pub struct UserFilter {
    pub role: Option<Role>,
    pub search: Option<String>,
    pub limit: usize,
    pub offset: usize,
}

pub struct UserRepository<'c> {
    conn: &'c Connection,
}

impl<'c> UserRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Insert or refresh a mirrored user. The local `office_id` survives only
    /// while the user stays a manager.
    pub fn upsert(&self, user: &UserEntity) -> Result<()> {
        self.conn.execute(
            r"
            INSERT INTO users (id, email, name, phone, role, office_id, image_url, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT(id) DO UPDATE SET
                email = excluded.email,
                name = excluded.name,
                phone = excluded.phone,
                role = excluded.role,
                office_id = CASE WHEN excluded.role = 'MANAGER' THEN users.office_id ELSE NULL END,
                image_url = excluded.image_url,
                updated_at = excluded.updated_at
            ",
            params![
                user.id,
                user.email,
                user.name,
                user.phone,
                user.role,
                user.office_id,
                user.image_url,
                user.created_at,
                user.updated_at,
            ],
        )?;
        Ok(())
    }

    pub fn update(&self, user: &UserEntity) -> Result<()> {
        self.conn.execute(
            r"
            UPDATE users
            SET email = ?2, name = ?3, phone = ?4, role = ?5, office_id = ?6, image_url = ?7, updated_at = ?8
            WHERE id = ?1
            ",
            params![
                user.id,
                user.email,
                user.name,
                user.phone,
                user.role,
                user.office_id,
                user.image_url,
                user.updated_at,
            ],
        )?;
        Ok(())
    }

    pub fn find(&self, id: &str) -> Result<Option<UserEntity>> {
        let user = self
            .conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM users WHERE id = ?1"),
                [id],
                Self::map_row,
            )
            .optional()?;
        Ok(user)
    }

    pub fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.conn.execute("DELETE FROM users WHERE id = ?1", [id])? > 0)
    }

    pub fn list(&self, filter: &UserFilter) -> Result<(Vec<UserEntity>, usize)> {
        let role = filter.role;
        let pattern = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s.to_lowercase()));

        let where_clause = r"
            WHERE (?1 IS NULL OR role = ?1)
              AND (?2 IS NULL OR lower(name) LIKE ?2 OR lower(email) LIKE ?2)
        ";

        let total: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM users {where_clause}"),
            params![role, pattern],
            |row| row.get(0),
        )?;

        let mut stmt = self.conn.prepare(&format!(
            "SELECT {COLUMNS} FROM users {where_clause} ORDER BY created_at DESC LIMIT ?3 OFFSET ?4"
        ))?;
        let users = stmt
            .query_map(
                params![role, pattern, filter.limit as i64, filter.offset as i64],
                Self::map_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((users, total as usize))
    }

    pub fn list_by_roles(&self, roles: &[Role]) -> Result<Vec<UserEntity>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {COLUMNS} FROM users ORDER BY created_at ASC"
        ))?;
        let users = stmt
            .query_map([], Self::map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(users.into_iter().filter(|u| roles.contains(&u.role)).collect())
    }

    pub fn clear_office(&self, office_id: &str) -> Result<usize> {
        let n = self.conn.execute(
            "UPDATE users SET office_id = NULL, updated_at = ?2 WHERE office_id = ?1",
            params![office_id, Utc::now()],
        )?;
        Ok(n)
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<UserEntity> {
        Ok(UserEntity {
            id: row.get("id")?,
            email: row.get("email")?,
            name: row.get("name")?,
            phone: row.get("phone")?,
            role: row.get("role")?,
            office_id: row.get("office_id")?,
            image_url: row.get("image_url")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::persistence::database::Database;

    #[tokio::test]
    async fn upsert_keeps_office_assignment() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            let repo = UserRepository::new(conn);
            conn.execute(
                "INSERT INTO offices (id, name, address, city, created_at, updated_at) VALUES ('o1', 'HQ', 'Main St', 'Pune', '2024-01-01', '2024-01-01')",
                [],
            )?;

            let mut user = UserEntity::new("u1", "a@example.com", "Asha", Role::Manager);
            user.office_id = Some("o1".into());
            repo.upsert(&user)?;

            let mut refreshed = UserEntity::new("u1", "asha@example.com", "Asha K", Role::Manager);
            refreshed.office_id = None;
            repo.upsert(&refreshed)?;

            let stored = repo.find("u1")?.unwrap();
            assert_eq!(stored.email, "asha@example.com");
            assert_eq!(stored.office_id.as_deref(), Some("o1"));

            repo.upsert(&UserEntity::new("u1", "asha@example.com", "Asha K", Role::Client))?;
            assert_eq!(repo.find("u1")?.unwrap().office_id, None);
            Ok(())
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn list_filters_by_role_and_search() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            let repo = UserRepository::new(conn);
            repo.upsert(&UserEntity::new("u1", "ravi@example.com", "Ravi", Role::Client))?;
            repo.upsert(&UserEntity::new("u2", "meera@example.com", "Meera", Role::Client))?;
            repo.upsert(&UserEntity::new("u3", "boss@example.com", "Boss", Role::Admin))?;

            let (clients, total) = repo.list(&UserFilter {
                role: Some(Role::Client),
                limit: 10,
                ..Default::default()
            })?;
            assert_eq!(total, 2);
            assert_eq!(clients.len(), 2);

            let (found, total) = repo.list(&UserFilter {
                search: Some("MEE".into()),
                limit: 10,
                ..Default::default()
            })?;
            assert_eq!(total, 1);
            assert_eq!(found[0].id, "u2");

            let staff = repo.list_by_roles(Role::STAFF)?;
            assert_eq!(staff.len(), 1);
            Ok(())
        })
        .await
        .unwrap();
    }
}
