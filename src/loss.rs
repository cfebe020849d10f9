use std::fmt;
use std::str::FromStr;

use ndarray::{Array1, ArrayView1, Zip};

use crate::activation::Activation;
use crate::error::Error;

/// Keeps `ln` away from zero when a Softmax output saturates.
const CROSS_ENTROPY_EPSILON: f64 = 1e-15;

/// Loss functions over a predicted/expected vector pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Loss {
    MSE,
    CrossEntropy,
}

impl Loss {
    pub fn apply(&self, predicted: ArrayView1<f64>, expected: ArrayView1<f64>) -> f64 {
        match self {
            Self::MSE => Zip::from(&predicted)
                .and(&expected)
                .fold(0.0, |loss, &p, &e| loss + 0.5 * (p - e).powi(2)),
            Self::CrossEntropy => Zip::from(&predicted)
                .and(&expected)
                .fold(0.0, |loss, &p, &e| {
                    loss - e * (p + CROSS_ENTROPY_EPSILON).ln()
                }),
        }
    }

    /// Gradient of the loss with respect to the predictions.
    ///
    /// Both variants reduce to `predicted - expected`: for MSE that is the
    /// per-output derivative, for CrossEntropy it is the combined gradient
    /// through a Softmax output layer rather than the raw one.
    pub fn derivative(&self, predicted: ArrayView1<f64>, expected: ArrayView1<f64>) -> Array1<f64> {
        &predicted - &expected
    }

    /// Default loss for a network whose output layer uses `activation`:
    /// CrossEntropy under Softmax, MSE otherwise.
    pub fn for_output(activation: Activation) -> Self {
        match activation {
            Activation::Softmax => Self::CrossEntropy,
            _ => Self::MSE,
        }
    }

    /// Identifier recorded in serialized models.
    pub fn name(&self) -> &'static str {
        match self {
            Self::MSE => "MSE",
            Self::CrossEntropy => "CrossEntropy",
        }
    }
}

impl fmt::Display for Loss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Loss {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "MSE" => Ok(Self::MSE),
            "CrossEntropy" => Ok(Self::CrossEntropy),
            _ => Err(Error::UnknownFunction(name.to_string())),
        }
    }
}
