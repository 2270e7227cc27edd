//! Database entities backing the public API.

pub mod inventory;
pub mod location;
pub mod material;
