pub mod identity_service;
pub mod office_service;
pub mod user_service;
