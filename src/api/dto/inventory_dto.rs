//! Inventory query DTOs
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectListQuery {
    pub city: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlotListQuery {
    pub project_id: Option<String>,
    pub status: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    /// `price_asc`, `price_desc` or `newest`.
    pub sort: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}
