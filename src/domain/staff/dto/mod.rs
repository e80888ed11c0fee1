pub mod leave_request_create_request;
