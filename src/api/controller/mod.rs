//! Controllers: thin adapters from extracted requests to service facades.

pub mod analytics;
pub mod banner_ad;
pub mod buy_request;
pub mod camera;
pub mod feedback;
pub mod land;
pub mod leave_request;
pub mod notification;
pub mod office;
pub mod plot;
pub mod project;
pub mod sell_request;
pub mod system;
pub mod user;
pub mod visit_request;
pub mod webhook;
