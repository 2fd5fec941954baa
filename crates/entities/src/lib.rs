//! Core entity definitions for the users service.
//!
//! This crate defines the user record, the persisted collection document and
//! the value types passed between the service and storage layers.

mod filter;
mod user;

pub use filter::*;
pub use user::*;
