//! Business services.

pub mod user_service;
