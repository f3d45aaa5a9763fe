//! CLI command implementations.

pub mod analyze;
pub mod check;
pub mod common;
pub mod info;
pub mod render;
pub mod store;
