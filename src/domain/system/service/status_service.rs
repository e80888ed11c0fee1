use std::collections::BTreeMap;
use std::time::Instant;

use anyhow::Result;
use serde::Serialize;

use crate::core::persistence::database::Database;
use crate::core::persistence::migrations::get_schema_version;
use crate::core::persistence::schema::COUNTED_TABLES;
use crate::domain::common::model::Actor;

#[derive(Debug, Clone, Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub uptime_secs: u64,
    pub schema_version: i32,
    pub tables: BTreeMap<&'static str, i64>,
}

pub async fn status(db: &Database, actor: Actor, started_at: Instant) -> Result<SystemStatus> {
    actor.require_admin()?;

    let mut tables = BTreeMap::new();
    for table in COUNTED_TABLES {
        tables.insert(*table, db.count_rows(*table).await?);
    }
    let schema_version = db.with_conn(|conn| get_schema_version(conn)).await?;

    Ok(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: started_at.elapsed().as_secs(),
        schema_version,
        tables,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::persistence::user::user_entity::Role;
    use crate::domain::common::service::test_support::seed_user;

    #[tokio::test]
    async fn status_reports_counts_and_version() {
        let db = Database::open_in_memory().unwrap();
        let admin = seed_user(&db, "admin", Role::Admin).await;

        let status = status(&db, admin, Instant::now()).await.unwrap();
        assert_eq!(status.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(status.tables["users"], 1);
        assert_eq!(status.tables.len(), COUNTED_TABLES.len());
        assert_eq!(status.schema_version, 1);
    }
}
