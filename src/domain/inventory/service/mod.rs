pub mod plot_service;
pub mod project_service;
