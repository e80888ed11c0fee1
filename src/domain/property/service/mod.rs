pub mod camera_service;
pub mod land_service;
