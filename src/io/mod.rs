//! File exports: per-day CSV results and portable forecast JSON.

pub mod export;
pub mod forecast;
