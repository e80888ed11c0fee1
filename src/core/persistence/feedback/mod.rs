pub mod feedback_entity;
pub mod feedback_repository;
