use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A real-estate development that groups plots.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectEntity {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub location: String,
    pub city: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
