pub mod land_camera_entity;
pub mod land_camera_repository;
