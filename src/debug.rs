use anyhow::Result;
use tracing::info;

use crate::core::persistence::database::Database;
use crate::core::persistence::migrations::get_schema_version;
use crate::core::persistence::schema::COUNTED_TABLES;

/// Runs only when ESTATE_DEBUG_MODE is set: dumps schema and row counts.
pub async fn run_debug(db: &Database) -> Result<()> {
    info!("🔧 Debug mode: running debug tasks...");

    let version = db.with_conn(|conn| get_schema_version(conn)).await?;
    info!(version, path = %db.path().display(), "Schema");
    for &table in COUNTED_TABLES {
        let rows = db.count_rows(table).await?;
        info!(table, rows, "Table");
    }

    info!("Debug tasks completed. Exiting...");
    Ok(())
}
