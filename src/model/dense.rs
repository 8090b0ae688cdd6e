//! Fully connected layer.

use nalgebra::{DMatrix, DVector};
use rand::Rng;
use rand::rngs::StdRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Relu,
    Linear,
}

impl Activation {
    pub fn apply(self, z: &DVector<f64>) -> DVector<f64> {
        match self {
            Activation::Relu => z.map(|v| v.max(0.0)),
            Activation::Linear => z.clone(),
        }
    }

    /// Derivative evaluated at the pre-activation `z`.
    pub fn derivative(self, z: &DVector<f64>) -> DVector<f64> {
        match self {
            Activation::Relu => z.map(|v| if v > 0.0 { 1.0 } else { 0.0 }),
            Activation::Linear => DVector::from_element(z.len(), 1.0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Dense {
    pub weights: DMatrix<f64>,
    pub bias: DVector<f64>,
    pub activation: Activation,
}

impl Dense {
    /// Uniform init in `[-1/sqrt(fan_in), 1/sqrt(fan_in)]`, zero bias.
    pub fn new(input: usize, output: usize, activation: Activation, rng: &mut StdRng) -> Self {
        let limit = (1.0 / input as f64).sqrt();
        Self {
            weights: DMatrix::from_fn(output, input, |_, _| rng.gen_range(-limit..limit)),
            bias: DVector::zeros(output),
            activation,
        }
    }

    pub fn pre_activation(&self, input: &DVector<f64>) -> DVector<f64> {
        &self.weights * input + &self.bias
    }

    pub fn forward(&self, input: &DVector<f64>) -> DVector<f64> {
        self.activation.apply(&self.pre_activation(input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn relu_zeroes_negative_entries() {
        let z = DVector::from_row_slice(&[-1.0, 0.0, 2.5]);
        let out = Activation::Relu.apply(&z);
        assert_eq!(out.as_slice(), &[0.0, 0.0, 2.5]);
        let d = Activation::Relu.derivative(&z);
        assert_eq!(d.as_slice(), &[0.0, 0.0, 1.0]);
    }

    #[test]
    fn forward_shape_matches_output_size() {
        let mut rng = StdRng::seed_from_u64(3);
        let layer = Dense::new(4, 2, Activation::Linear, &mut rng);
        let out = layer.forward(&DVector::from_element(4, 0.5));
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|v| v.is_finite()));
    }
}
