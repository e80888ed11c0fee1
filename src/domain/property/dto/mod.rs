pub mod camera_request;
pub mod land_upsert_request;
