//! Query DTOs for reviewable requests and inbox views
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusQuery {
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CameraListQuery {
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationListQuery {
    #[serde(default)]
    pub unread_only: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SalesQuery {
    pub months: Option<u32>,
}
