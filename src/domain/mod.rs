//! Shared domain types for the forecast pipeline.

mod types;

pub use types::*;
