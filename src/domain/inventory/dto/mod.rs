pub mod plot_request;
pub mod project_upsert_request;
