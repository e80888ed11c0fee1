use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Land held by a client, usually created when a plot is sold to them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LandEntity {
    pub id: String,
    pub owner_id: String,
    pub plot_id: Option<String>,
    pub name: String,
    pub area_sq_yards: f64,
    pub location: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
