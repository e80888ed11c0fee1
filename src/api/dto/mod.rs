//! Wire-level DTOs shared by the controllers.

pub mod inventory_dto;
pub mod paginated_response;
pub mod request_dto;
pub mod system_dto;
pub mod user_dto;

use serde::Serialize;

/// Envelope for every successful response.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}
