use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::app_state::AppState;

/// Lapse approved visit passes whose visit day has ended.
pub async fn run(state: &AppState, now: DateTime<Utc>) -> Result<usize> {
    debug!("Running visit expiry task...");
    let expired = state.request_service.expire_visit_passes(now).await?;
    if expired > 0 {
        info!(expired, "Visit passes expired");
    }
    Ok(expired)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_state::build_app_state;
    use crate::config::AppConfig;
    use crate::core::persistence::database::Database;

    #[tokio::test]
    async fn nothing_to_expire_on_empty_database() {
        let db = Database::open_in_memory().unwrap();
        let state = build_app_state(db, &AppConfig::default());
        assert_eq!(run(&state, Utc::now()).await.unwrap(), 0);
    }
}
