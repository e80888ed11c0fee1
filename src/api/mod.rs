//! HTTP surface: extractors, controllers, DTOs and route tables.

pub mod auth;
pub mod controller;
pub mod dto;
pub mod routes;
pub mod util;
