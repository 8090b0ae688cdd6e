//! Recurrent regressor: Elman cell + dense head, with analytic BPTT.

use nalgebra::{DMatrix, DVector};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::dense::{Activation, Dense};

/// Elman recurrent cell over scalar inputs.
///
/// `h_t = tanh(w_x * x_t + W_h * h_{t-1} + b)`
#[derive(Debug, Clone)]
pub struct RnnCell {
    pub hidden_size: usize,
    w_x: DVector<f64>,
    w_h: DMatrix<f64>,
    b: DVector<f64>,
}

impl RnnCell {
    fn new(hidden_size: usize, rng: &mut StdRng) -> Self {
        let limit = (1.0 / hidden_size as f64).sqrt();
        Self {
            hidden_size,
            w_x: DVector::from_fn(hidden_size, |_, _| rng.gen_range(-limit..limit)),
            w_h: DMatrix::from_fn(hidden_size, hidden_size, |_, _| rng.gen_range(-limit..limit)),
            b: DVector::zeros(hidden_size),
        }
    }

    fn forward(&self, x: f64, h_prev: &DVector<f64>) -> DVector<f64> {
        (&self.w_x * x + &self.w_h * h_prev + &self.b).map(f64::tanh)
    }

    fn init_hidden(&self) -> DVector<f64> {
        DVector::zeros(self.hidden_size)
    }
}

/// Sequence-to-one rate regressor.
///
/// Maps a window of `window` normalized rates to the next normalized rate:
/// recurrent layer, ReLU dense layer, linear scalar output.
#[derive(Debug, Clone)]
pub struct RateRnn {
    pub window: usize,
    cell: RnnCell,
    hidden: Dense,
    w_out: DVector<f64>,
    b_out: f64,
}

/// Intermediate activations kept for backpropagation.
pub(crate) struct ForwardCache {
    /// Hidden states `h_0..h_W` (`h_0` is the zero state).
    states: Vec<DVector<f64>>,
    /// Dense-layer pre-activation.
    z1: DVector<f64>,
    /// Dense-layer output.
    d1: DVector<f64>,
    pub prediction: f64,
}

/// Parameter gradients for one sample.
pub(crate) struct Gradients {
    w_x: DVector<f64>,
    w_h: DMatrix<f64>,
    b_h: DVector<f64>,
    w1: DMatrix<f64>,
    b1: DVector<f64>,
    w_out: DVector<f64>,
    b_out: f64,
}

impl Gradients {
    fn norm(&self) -> f64 {
        let mut sum = self.b_out * self.b_out;
        sum += self.w_x.norm_squared();
        sum += self.w_h.norm_squared();
        sum += self.b_h.norm_squared();
        sum += self.w1.norm_squared();
        sum += self.b1.norm_squared();
        sum += self.w_out.norm_squared();
        sum.sqrt()
    }

    /// Rescale so the global gradient norm does not exceed `max_norm`.
    ///
    /// BPTT through tanh can still produce occasional large gradients on
    /// short windows; clipping keeps plain SGD stable.
    pub(crate) fn clip(&mut self, max_norm: f64) {
        let norm = self.norm();
        if norm > max_norm && norm.is_finite() {
            let scale = max_norm / norm;
            self.w_x *= scale;
            self.w_h *= scale;
            self.b_h *= scale;
            self.w1 *= scale;
            self.b1 *= scale;
            self.w_out *= scale;
            self.b_out *= scale;
        }
    }
}

impl RateRnn {
    pub fn new(window: usize, hidden_size: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let cell = RnnCell::new(hidden_size, &mut rng);
        let hidden = Dense::new(hidden_size, hidden_size, Activation::Relu, &mut rng);
        let limit = (1.0 / hidden_size as f64).sqrt();
        let w_out = DVector::from_fn(hidden_size, |_, _| rng.gen_range(-limit..limit));
        Self {
            window,
            cell,
            hidden,
            w_out,
            b_out: 0.0,
        }
    }

    /// Predict the next normalized value from a full window.
    pub fn predict(&self, xs: &[f64]) -> f64 {
        self.forward_cached(xs).prediction
    }

    pub(crate) fn forward_cached(&self, xs: &[f64]) -> ForwardCache {
        debug_assert_eq!(xs.len(), self.window);

        let mut states = Vec::with_capacity(xs.len() + 1);
        states.push(self.cell.init_hidden());
        for &x in xs {
            let h = self.cell.forward(x, states.last().expect("non-empty states"));
            states.push(h);
        }

        let z1 = self.hidden.pre_activation(states.last().expect("non-empty states"));
        let d1 = self.hidden.activation.apply(&z1);
        let prediction = self.w_out.dot(&d1) + self.b_out;

        ForwardCache {
            states,
            z1,
            d1,
            prediction,
        }
    }

    /// Backpropagate `dloss = dL/dprediction` through the head and through
    /// time, returning gradients for every parameter.
    pub(crate) fn backward(&self, xs: &[f64], cache: &ForwardCache, dloss: f64) -> Gradients {
        let last = cache.states.last().expect("non-empty states");

        // Output layer (linear scalar).
        let grad_w_out = &cache.d1 * dloss;
        let grad_b_out = dloss;

        // Dense layer.
        let delta1 = (&self.w_out * dloss).component_mul(&self.hidden.activation.derivative(&cache.z1));
        let grad_w1 = &delta1 * last.transpose();
        let grad_b1 = delta1.clone();

        // Through time. `delta_h` is dL/dh_t entering step t from above.
        let mut delta_h = self.hidden.weights.transpose() * &delta1;
        let hidden_size = self.cell.hidden_size;
        let mut grad_w_x = DVector::zeros(hidden_size);
        let mut grad_w_h = DMatrix::zeros(hidden_size, hidden_size);
        let mut grad_b_h = DVector::zeros(hidden_size);

        for t in (1..=xs.len()).rev() {
            let h_t = &cache.states[t];
            // d tanh(z) = 1 - tanh(z)^2, with tanh(z) = h_t.
            let dz = delta_h.component_mul(&h_t.map(|h| 1.0 - h * h));
            grad_w_x += &dz * xs[t - 1];
            grad_w_h += &dz * cache.states[t - 1].transpose();
            grad_b_h += &dz;
            delta_h = self.cell.w_h.transpose() * &dz;
        }

        Gradients {
            w_x: grad_w_x,
            w_h: grad_w_h,
            b_h: grad_b_h,
            w1: grad_w1,
            b1: grad_b1,
            w_out: grad_w_out,
            b_out: grad_b_out,
        }
    }

    /// SGD step.
    pub(crate) fn apply(&mut self, grads: &Gradients, learning_rate: f64) {
        self.cell.w_x -= &grads.w_x * learning_rate;
        self.cell.w_h -= &grads.w_h * learning_rate;
        self.cell.b -= &grads.b_h * learning_rate;
        self.hidden.weights -= &grads.w1 * learning_rate;
        self.hidden.bias -= &grads.b1 * learning_rate;
        self.w_out -= &grads.w_out * learning_rate;
        self.b_out -= grads.b_out * learning_rate;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prediction_is_deterministic_per_seed() {
        let xs = [0.1, 0.4, 0.3, 0.6];
        let a = RateRnn::new(4, 6, 42).predict(&xs);
        let b = RateRnn::new(4, 6, 42).predict(&xs);
        let c = RateRnn::new(4, 6, 43).predict(&xs);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.is_finite());
    }

    /// Central finite differences on a squared-error loss must match the
    /// analytic gradients for a representative entry of every parameter.
    #[test]
    fn analytic_gradients_match_finite_differences() {
        let xs = [0.2, 0.5, 0.4, 0.7];
        let target = 0.55;
        let model = RateRnn::new(4, 3, 7);

        let cache = model.forward_cached(&xs);
        let dloss = 2.0 * (cache.prediction - target);
        let grads = model.backward(&xs, &cache, dloss);

        let loss = |m: &RateRnn| {
            let p = m.predict(&xs);
            (p - target) * (p - target)
        };
        let eps = 1e-6;
        let check = |analytic: f64, perturb: &dyn Fn(&mut RateRnn, f64)| {
            let mut plus = model.clone();
            perturb(&mut plus, eps);
            let mut minus = model.clone();
            perturb(&mut minus, -eps);
            let numeric = (loss(&plus) - loss(&minus)) / (2.0 * eps);
            assert!(
                (analytic - numeric).abs() < 1e-5,
                "analytic {analytic} vs numeric {numeric}"
            );
        };

        check(grads.w_x[0], &|m, e| m.cell.w_x[0] += e);
        check(grads.w_h[(1, 2)], &|m, e| m.cell.w_h[(1, 2)] += e);
        check(grads.b_h[1], &|m, e| m.cell.b[1] += e);
        check(grads.w1[(0, 1)], &|m, e| m.hidden.weights[(0, 1)] += e);
        check(grads.b1[2], &|m, e| m.hidden.bias[2] += e);
        check(grads.w_out[1], &|m, e| m.w_out[1] += e);
        check(grads.b_out, &|m, e| m.b_out += e);
    }

    #[test]
    fn clipping_bounds_the_gradient_norm() {
        let xs = [0.9, 0.1, 0.8, 0.2];
        let model = RateRnn::new(4, 5, 11);
        let cache = model.forward_cached(&xs);
        let mut grads = model.backward(&xs, &cache, 100.0);
        grads.clip(1.0);
        assert!(grads.norm() <= 1.0 + 1e-9);
    }
}
