pub mod leave_request_entity;
pub mod leave_request_repository;
