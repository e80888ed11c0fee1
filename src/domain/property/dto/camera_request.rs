use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::persistence::camera::camera_entity::CameraStatus;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CameraUpsertRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    /// RTSP/HLS endpoint of the live feed.
    #[validate(url)]
    pub stream_url: String,

    #[validate(length(max = 300))]
    pub location: Option<String>,

    /// Defaults to `ACTIVE` on create and to the current value on update.
    pub status: Option<CameraStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CameraAssignRequest {
    #[validate(length(min = 1))]
    pub camera_id: String,
}
