//! Business rules, one module per area. Services are free async functions
//! over a [`Database`](crate::core::persistence::database::Database) handle.

pub mod analytics;
pub mod common;
pub mod engagement;
pub mod inventory;
pub mod property;
pub mod request;
pub mod staff;
pub mod system;
pub mod user;
