pub mod visit_expiry;
