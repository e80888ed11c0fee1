pub mod buy_request_create_request;
pub mod sell_request_create_request;
pub mod visit_request_create_request;
