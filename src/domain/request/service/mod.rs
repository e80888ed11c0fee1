pub mod buy_request_service;
pub mod sell_request_service;
pub mod visit_request_service;
