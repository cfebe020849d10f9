use std::{collections::HashMap, hash::Hash};

use ndarray::{Array1, ArrayView1};

pub mod activation;
pub mod error;
pub mod init;
pub mod layer;
pub mod loss;
pub mod metrics;
pub mod network;
pub mod neuron;
pub mod persist;
pub mod signal;

pub use activation::Activation;
pub use error::{Error, Result};
pub use layer::LayerSpec;
pub use loss::Loss;
pub use network::Network;
pub use persist::{NetworkDocument, DEFAULT_PRECISION};
pub use signal::Signal;

#[macro_export]
macro_rules! assert_rel_eq_arr1 {
    ($actual:expr, $expected:expr) => {
        assert_eq!($actual.shape(), $expected.shape());
        ndarray::Zip::from(&$actual)
            .and(&$expected)
            .for_each(|v, w| {
                assert_relative_eq!(v, w);
            });
    };
}

/// Encode labels to one-hot vectors and decode them.
pub struct OneHotEncoder<Label>
where
    Label: Hash + Eq + Clone,
{
    label_to_id: HashMap<Label, usize>,
    id_to_label: Vec<Label>,
}

impl<Label> OneHotEncoder<Label>
where
    Label: Hash + Eq + Clone,
{
    /// Record labels to convert.
    pub fn new(label_kinds: Vec<Label>) -> Self {
        let label_to_id = label_kinds
            .iter()
            .cloned()
            .enumerate()
            .map(|(id, label)| (label, id))
            .collect();
        Self {
            label_to_id,
            id_to_label: label_kinds,
        }
    }

    /// Encode one label to a one-hot vector sized to the label kinds.
    /// Panics if an unknown label is passed.
    pub fn encode(&self, label: &Label) -> Array1<f64> {
        let id = self.label_to_id.get(label).expect("Unknown label");
        let mut one_hot = Array1::zeros(self.id_to_label.len());
        one_hot[*id] = 1.0;
        one_hot
    }

    /// Decode a network output to a label, determined by the argmax of the
    /// vector.
    pub fn decode(&self, output: ArrayView1<f64>) -> Label {
        let id = output
            .iter()
            .enumerate()
            .fold(
                (0, f64::NEG_INFINITY),
                |(max_index, max_elem), (index, &elem)| {
                    if elem > max_elem {
                        (index, elem)
                    } else {
                        (max_index, max_elem)
                    }
                },
            )
            .0;
        self.id_to_label[id].clone()
    }
}
