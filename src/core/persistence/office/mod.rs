pub mod office_entity;
pub mod office_repository;
