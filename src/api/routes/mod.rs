//! API route declarations (e.g., /api/v1/*)

pub mod analytics_routes;
pub mod banner_ad_routes;
pub mod buy_request_routes;
pub mod camera_routes;
pub mod feedback_routes;
pub mod land_routes;
pub mod leave_request_routes;
pub mod notification_routes;
pub mod office_routes;
pub mod plot_routes;
pub mod project_routes;
pub mod sell_request_routes;
pub mod system_routes;
pub mod user_routes;
pub mod visit_request_routes;
pub mod webhook_routes;
