//! Utilities shared across Kokuban crates.

pub mod logger;
pub mod time;
