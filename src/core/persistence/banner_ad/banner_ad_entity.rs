use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Promotional banner shown on the landing page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BannerAdEntity {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub image_url: String,
    pub link_url: Option<String>,
    pub active: bool,
    /// Lower comes first.
    pub display_order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
