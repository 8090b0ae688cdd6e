//! Series preparation: min/max normalization and sliding-window slicing.
//!
//! This is the step between raw fetched rates and model training. It is
//! deliberately free of any model or I/O code so the arithmetic stays
//! trivially testable.

mod normalize;
mod window;

pub use normalize::NormParams;
pub use window::{WindowSet, make_windows};
