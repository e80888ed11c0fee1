pub mod buy_request_entity;
pub mod buy_request_repository;
