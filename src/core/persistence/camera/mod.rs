pub mod camera_entity;
pub mod camera_repository;
