pub mod plot_entity;
pub mod plot_repository;
