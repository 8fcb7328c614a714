//! Configuration module for the teamcard renderer
//!
//! Provides types and parsing for `teamcard.toml`.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
