use serde::{Serialize, Deserialize};
use std::f64::consts::E;

/// Element-wise activation shared by every non-input neuron of a network.
///
/// Backpropagation evaluates `derivative` at the neuron's cached *output*,
/// not at its raw input.  For ReLU the two agree; for Sigmoid and Tanh the
/// backward pass therefore scales deltas by f'(f(z)) rather than f'(z).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    #[default]
    Sigmoid,
    #[serde(rename = "relu")]
    ReLU,
    Tanh,
    Identity,
}

impl Activation {
    pub fn function(&self, x: f64) -> f64 {
        match self {
            Activation::Sigmoid => 1.0 / (1.0 + E.powf(-x)),
            Activation::ReLU => if x > 0.0 { x } else { 0.0 },
            Activation::Tanh => x.tanh(),
            Activation::Identity => x,
        }
    }

    /// Element-wise derivative of the activation at `x`.
    ///
    /// ReLU uses the convention that `x <= 0` has derivative 0.
    pub fn derivative(&self, x: f64) -> f64 {
        match self {
            Activation::Sigmoid => {
                let fx = self.function(x);
                fx * (1.0 - fx)
            }
            Activation::ReLU => if x <= 0.0 { 0.0 } else { 1.0 },
            Activation::Tanh => {
                let t = x.tanh();
                1.0 - t * t
            }
            Activation::Identity => 1.0,
        }
    }
}
