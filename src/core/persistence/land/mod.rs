pub mod land_entity;
pub mod land_repository;
