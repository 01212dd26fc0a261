//! Activation functions applied by the network evaluator.

use serde::{Deserialize, Serialize};

/// Activation function applied to the weighted input sum of hidden and output nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Activation {
    /// Identity function: f(x) = x
    Identity,
    /// Sigmoid: f(x) = 1 / (1 + e^(-x))
    Sigmoid,
    /// Hyperbolic tangent: f(x) = tanh(x)
    #[default]
    Tanh,
    /// Rectified Linear Unit: f(x) = max(0, x)
    ReLU,
    /// Gaussian: f(x) = e^(-x^2)
    Gaussian,
}

impl Activation {
    /// All available activation functions.
    pub const ALL: [Self; 5] = [
        Self::Identity,
        Self::Sigmoid,
        Self::Tanh,
        Self::ReLU,
        Self::Gaussian,
    ];

    /// Apply this activation function to an input value.
    ///
    /// NaN propagates. Infinite inputs map to the function's limit.
    #[inline]
    #[must_use]
    pub fn apply(self, x: f32) -> f32 {
        if x.is_nan() {
            return f32::NAN;
        }

        match self {
            Self::Identity => x,
            // Clamp to avoid overflow in exp; sigmoid(+-88) is already saturated.
            Self::Sigmoid => 1.0 / (1.0 + (-x.clamp(-88.0, 88.0)).exp()),
            // tanh(+-inf) is already +-1.
            Self::Tanh => x.tanh(),
            Self::ReLU => x.max(0.0),
            Self::Gaussian => {
                if x.abs() > 26.0 {
                    0.0
                } else {
                    (-x * x).exp()
                }
            }
        }
    }
}
