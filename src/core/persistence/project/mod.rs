pub mod project_entity;
pub mod project_repository;
