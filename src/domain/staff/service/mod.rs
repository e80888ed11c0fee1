pub mod leave_request_service;
