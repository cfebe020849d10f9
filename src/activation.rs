use std::fmt;
use std::str::FromStr;

use ndarray::{Array1, ArrayView1};

use crate::error::Error;

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Activation functions applied per layer. The whole pre-activation vector is
/// transformed at once because Softmax is not neuron-local.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    ReLU,
    LeakyReLU,
    Sigmoid,
    Softmax,
}

impl Activation {
    pub fn apply(&self, pre_activations: ArrayView1<f64>) -> Array1<f64> {
        match self {
            Self::ReLU => pre_activations.map(|&x| if x > 0.0 { x } else { 0.0 }),
            Self::LeakyReLU => pre_activations.map(|&x| if x > 0.0 { x } else { 0.01 * x }),
            Self::Sigmoid => pre_activations.map(|&x| sigmoid(x)),
            Self::Softmax => {
                // Subtracting the maximum keeps the exponentials finite for
                // large-magnitude inputs.
                let max_element = pre_activations.iter().fold(f64::NAN, |v, &w| v.max(w));
                let exp_each = pre_activations.map(|&x| (x - max_element).exp());
                let exp_sum = exp_each.sum();
                exp_each / exp_sum
            }
        }
    }

    /// Derivative with respect to the pre-activations, element by element.
    ///
    /// Softmax returns a neutral all-ones vector: its non-diagonal Jacobian is
    /// folded into the combined Softmax+CrossEntropy gradient in the backward
    /// pass, which uses the loss gradient as the output delta directly.
    pub fn derivative(&self, pre_activations: ArrayView1<f64>) -> Array1<f64> {
        match self {
            Self::ReLU => pre_activations.map(|&x| if x >= 0.0 { 1.0 } else { 0.0 }),
            Self::LeakyReLU => pre_activations.map(|&x| if x > 0.0 { 1.0 } else { 0.01 }),
            Self::Sigmoid => pre_activations.map(|&x| {
                let s = sigmoid(x);
                s * (1.0 - s)
            }),
            Self::Softmax => Array1::ones(pre_activations.len()),
        }
    }

    /// Identifier recorded in serialized models.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ReLU => "ReLU",
            Self::LeakyReLU => "LeakyReLU",
            Self::Sigmoid => "Sigmoid",
            Self::Softmax => "Softmax",
        }
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Activation {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "ReLU" => Ok(Self::ReLU),
            "LeakyReLU" => Ok(Self::LeakyReLU),
            "Sigmoid" => Ok(Self::Sigmoid),
            "Softmax" => Ok(Self::Softmax),
            _ => Err(Error::UnknownFunction(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::assert_rel_eq_arr1;

    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use ndarray::arr1;

    #[test]
    fn relu_apply() {
        let x = arr1(&[-2.0, -1.0, 0.0, 1.0, 2.0]);
        let actual = Activation::ReLU.apply(x.view());
        assert_rel_eq_arr1!(actual, arr1(&[0.0, 0.0, 0.0, 1.0, 2.0]));
    }

    #[test]
    fn relu_derivative() {
        let x = arr1(&[-2.0, -1.0, 0.0, 1.0, 2.0]);
        let actual = Activation::ReLU.derivative(x.view());
        assert_rel_eq_arr1!(actual, arr1(&[0.0, 0.0, 1.0, 1.0, 1.0]));
    }

    #[test]
    fn leaky_relu_apply() {
        let x = arr1(&[-2.0, -1.0, 0.0, 1.0, 2.0]);
        let actual = Activation::LeakyReLU.apply(x.view());
        assert_rel_eq_arr1!(actual, arr1(&[-0.02, -0.01, 0.0, 1.0, 2.0]));
    }

    #[test]
    fn leaky_relu_derivative() {
        let x = arr1(&[-2.0, -1.0, 0.0, 1.0, 2.0]);
        let actual = Activation::LeakyReLU.derivative(x.view());
        assert_rel_eq_arr1!(actual, arr1(&[0.01, 0.01, 0.01, 1.0, 1.0]));
    }

    #[test]
    fn sigmoid_apply() {
        let x = arr1(&[-2.0, -1.0, 0.0, 1.0, 2.0]);
        let actual = Activation::Sigmoid.apply(x.view());
        let expected = arr1(&[
            0.1192029220221175,
            0.2689414213699951,
            0.5000000000000000,
            0.7310585786300049,
            0.8807970779778823,
        ]);
        assert_rel_eq_arr1!(actual, expected);
    }

    #[test]
    fn sigmoid_derivative() {
        let x = arr1(&[-2.0, -1.0, 0.0, 1.0, 2.0]);
        let actual = Activation::Sigmoid.derivative(x.view());
        let expected = arr1(&[
            0.1049935854035065,
            0.1966119332414819,
            0.2500000000000000,
            0.1966119332414819,
            0.1049935854035066,
        ]);
        assert_rel_eq_arr1!(actual, expected);
    }

    #[test]
    fn softmax_sums_to_one() {
        let x = arr1(&[1.0, 0.5, -0.1, 0.5, 0.2, 3.0]);
        let actual = Activation::Softmax.apply(x.view());
        assert!(actual.iter().all(|&p| p > 0.0));
        assert_abs_diff_eq!(1.0, actual.sum(), epsilon = 1e-5);
    }

    #[test]
    fn softmax_is_stable_for_large_inputs() {
        let x = arr1(&[100.0, 101.0, 102.0]);
        let actual = Activation::Softmax.apply(x.view());
        assert!(actual.iter().all(|&p| p.is_finite() && p > 0.0));
        assert_abs_diff_eq!(1.0, actual.sum(), epsilon = 1e-5);
    }

    #[test]
    fn softmax_derivative_is_neutral() {
        let x = arr1(&[-2.0, 0.0, 3.0]);
        let actual = Activation::Softmax.derivative(x.view());
        assert_rel_eq_arr1!(actual, arr1(&[1.0, 1.0, 1.0]));
    }

    #[test]
    fn apply_and_derivative_preserve_length() {
        let x = arr1(&[-1.5, 0.0, 0.5, 2.0]);
        for activation in [
            Activation::ReLU,
            Activation::LeakyReLU,
            Activation::Sigmoid,
            Activation::Softmax,
        ] {
            assert_eq!(x.len(), activation.apply(x.view()).len());
            assert_eq!(x.len(), activation.derivative(x.view()).len());
        }
    }

    #[test]
    fn lookup_by_name_round_trips() {
        for activation in [
            Activation::ReLU,
            Activation::LeakyReLU,
            Activation::Sigmoid,
            Activation::Softmax,
        ] {
            assert_eq!(Ok(activation), activation.name().parse());
        }
    }

    #[test]
    fn lookup_of_unknown_name_fails() {
        assert_eq!(
            Err(Error::UnknownFunction("InvalidFunc".to_string())),
            "InvalidFunc".parse::<Activation>()
        );
    }
}
