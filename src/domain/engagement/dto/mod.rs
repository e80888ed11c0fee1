pub mod banner_ad_upsert_request;
pub mod feedback_create_request;
pub mod notification_broadcast_request;
