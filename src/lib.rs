//! Backend for a plotted-land sales business: inventory, site visits with QR
//! passes, buy/sell workflows, owned-land camera feeds and staff leave.

pub mod api;
pub mod app_state;
pub mod config;
pub mod core;
pub mod debug;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod routes;
pub mod scheduler;
