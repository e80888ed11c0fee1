pub mod log_repository;
