pub mod banner_ad_entity;
pub mod banner_ad_repository;
