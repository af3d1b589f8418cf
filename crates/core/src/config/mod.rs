//! Configuration loading and schema definitions
//!
//! Engine settings shared by every Skytrace front end.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;
