//! User storage for the users service.
//!
//! The whole user collection lives in a single JSON document. Every
//! repository call reads the document, applies its change in memory and
//! writes the document back in full.

mod document;
mod error;
mod file;
mod memory;
mod repository;

pub use document::*;
pub use error::*;
pub use file::*;
pub use memory::*;
pub use repository::*;
