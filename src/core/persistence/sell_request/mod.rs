pub mod sell_request_entity;
pub mod sell_request_repository;
