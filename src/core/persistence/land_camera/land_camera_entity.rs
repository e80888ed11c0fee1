use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LandCameraEntity {
    pub land_id: String,
    pub camera_id: String,
    pub assigned_by: String,
    pub assigned_at: DateTime<Utc>,
}
