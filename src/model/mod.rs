//! The sequence-to-one regression model and its training loop.
//!
//! Architecture: one recurrent (Elman/tanh) layer over `W` scalar steps,
//! a ReLU dense layer, and a linear output. Loss is mean squared error,
//! optimized with plain SGD and gradient-norm clipping, with full analytic
//! backpropagation through time.
//!
//! All linear algebra is `nalgebra`; everything is deterministic given a
//! seed. The model is owned by a single pipeline run and never persisted.

mod dense;
mod forecast;
mod rnn;
mod trainer;

pub use dense::{Activation, Dense};
pub use forecast::roll_forward;
pub use rnn::RateRnn;
pub use trainer::{TrainSettings, evaluate, fit};
