//! Data acquisition: the rate-history provider client and an offline
//! synthetic generator for demos and tests.

pub mod provider;
pub mod sample;

pub use provider::RateClient;
pub use sample::generate_series;
