pub mod log_service;
pub mod status_service;
