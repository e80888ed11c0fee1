//! User query DTOs
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserListQuery {
    pub role: Option<String>,
    pub search: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}
