//! Foundation module - Core utilities shared by the atlas crates
//!
//! - Logging utilities

pub mod logging;
