pub mod visit_request_entity;
pub mod visit_request_repository;
