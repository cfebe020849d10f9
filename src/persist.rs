use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::layer::LayerSpec;
use crate::network::Network;

/// Decimal digits kept when a model is exported.
pub const DEFAULT_PRECISION: u32 = 6;

/// One neuron's parameters, fixed-point encoded: the real values multiplied by
/// `10^precision` and rounded to the nearest integer. Weights are ordered by
/// upstream neuron.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeuronDocument {
    pub bias: i64,
    pub weights: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerDocument {
    pub neurons: Vec<NeuronDocument>,
    pub activation_function: String,
}

/// The persisted model shape. Field names are part of the format and shared
/// with other consumers of the exported JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDocument {
    pub layers: Vec<LayerDocument>,
    pub loss_function: String,
}

fn scale_of(precision: u32) -> f64 {
    10f64.powi(precision as i32)
}

impl Network {
    /// Exports the model at [`DEFAULT_PRECISION`] decimal digits.
    pub fn to_document(&self) -> NetworkDocument {
        self.to_document_with_precision(DEFAULT_PRECISION)
    }

    pub fn to_document_with_precision(&self, precision: u32) -> NetworkDocument {
        let scale = scale_of(precision);
        let layers = self
            .layers
            .iter()
            .map(|layer| LayerDocument {
                neurons: layer
                    .neurons
                    .iter()
                    .map(|neuron| NeuronDocument {
                        bias: (neuron.bias * scale).round() as i64,
                        weights: neuron
                            .inputs
                            .iter()
                            .map(|connection| (connection.weight * scale).round() as i64)
                            .collect(),
                    })
                    .collect(),
                activation_function: layer.activation.name().to_string(),
            })
            .collect();

        NetworkDocument {
            layers,
            loss_function: self.loss.name().to_string(),
        }
    }

    /// Rebuilds a network from an exported document written at
    /// [`DEFAULT_PRECISION`].
    pub fn from_document(document: &NetworkDocument) -> Result<Self> {
        Self::from_document_with_precision(document, DEFAULT_PRECISION)
    }

    /// Rebuilds a network from an exported document.
    ///
    /// The network is first constructed whole, with its usual random
    /// initialization, and every bias and weight is then overwritten from the
    /// document; the randomness never survives a load.
    pub fn from_document_with_precision(
        document: &NetworkDocument,
        precision: u32,
    ) -> Result<Self> {
        let specs = document
            .layers
            .iter()
            .map(|layer| {
                Ok(LayerSpec::new(
                    layer.neurons.len(),
                    layer.activation_function.parse()?,
                ))
            })
            .collect::<Result<Vec<_>>>()?;
        let loss = document.loss_function.parse()?;

        let mut network = Network::new(&specs, Some(loss))?;
        let scale = scale_of(precision);
        for (layer, layer_document) in network.layers.iter_mut().zip(&document.layers) {
            for (neuron, neuron_document) in layer.neurons.iter_mut().zip(&layer_document.neurons) {
                neuron.bias = neuron_document.bias as f64 / scale;
                for (connection, &weight) in
                    neuron.inputs.iter_mut().zip(&neuron_document.weights)
                {
                    connection.weight = weight as f64 / scale;
                }
            }
        }

        Ok(network)
    }
}
