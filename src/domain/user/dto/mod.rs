pub mod office_upsert_request;
pub mod user_update_request;
