//! Periodic background tasks.

pub mod tasks;

use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info};

use crate::app_state::AppState;
use crate::config::AppConfig;

/// Start the scheduler loop; abort the handle on shutdown.
pub fn spawn(state: AppState, config: &AppConfig) -> JoinHandle<()> {
    let period = Duration::from_secs(config.visit_expiry_sweep_secs);
    info!(period_secs = period.as_secs(), "Starting scheduler");

    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            if let Err(e) = tasks::visit_expiry::run(&state, Utc::now()).await {
                error!(?e, "Visit expiry task failed");
            }
        }
    })
}
