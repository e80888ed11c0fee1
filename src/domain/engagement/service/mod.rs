pub mod banner_ad_service;
pub mod feedback_service;
pub mod notification_service;
