pub mod notification_entity;
pub mod notification_repository;
