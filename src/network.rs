use ndarray::{Array1, ArrayView1};
use ndarray_rand::rand::{thread_rng, Rng};

use crate::activation::Activation;
use crate::error::{Error, Result};
use crate::init::{self, WeightInit};
use crate::layer::{Layer, LayerSpec};
use crate::loss::Loss;
use crate::neuron::{Connection, Neuron};
use crate::signal::Signal;

/// A fully connected feed-forward network: an ordered stack of layers, the
/// external input signals, and the loss function used for training.
///
/// Structure is fixed at construction; `forward`/`backward` only mutate signal
/// values, stored pre-activations, weights and biases.
pub struct Network {
    pub(crate) layers: Vec<Layer>,
    pub(crate) input_signals: Vec<Signal>,
    pub(crate) loss: Loss,
}

impl Network {
    /// Builds a randomly initialized network. Pass `None` to select the loss
    /// from the output activation: CrossEntropy under Softmax, MSE otherwise.
    pub fn new(specs: &[LayerSpec], loss: Option<Loss>) -> Result<Self> {
        Self::with_rng(specs, loss, &mut thread_rng())
    }

    /// Like [`Network::new`] with an injected random source, so construction
    /// is reproducible under a seeded generator.
    pub fn with_rng<R: Rng>(specs: &[LayerSpec], loss: Option<Loss>, rng: &mut R) -> Result<Self> {
        let last = specs.last().ok_or(Error::EmptyNetwork)?;
        if last.activation == Activation::Softmax && loss == Some(Loss::MSE) {
            // The Softmax derivative is only valid combined with CrossEntropy;
            // accepting MSE here would train on a wrong gradient.
            return Err(Error::UnsupportedPairing {
                activation: last.activation.name(),
                loss: Loss::MSE.name(),
            });
        }
        let loss = loss.unwrap_or_else(|| Loss::for_output(last.activation));

        // The external input slots are sized to the first layer.
        let input_signals = (0..specs[0].neurons)
            .map(|_| Signal::new(0.0))
            .collect::<Vec<_>>();

        let mut layers = Vec::with_capacity(specs.len());
        let mut upstream = input_signals.clone();
        for (index, spec) in specs.iter().enumerate() {
            let fan_in = upstream.len();
            let fan_out = specs
                .get(index + 1)
                .map_or(spec.neurons, |next| next.neurons);
            let weight_init = WeightInit::for_layer(spec.activation, fan_in, fan_out);

            let neurons = (0..spec.neurons)
                .map(|_| {
                    let inputs = upstream
                        .iter()
                        .map(|signal| Connection {
                            signal: signal.clone(),
                            weight: weight_init.sample(rng),
                        })
                        .collect();
                    Neuron::new(init::initial_bias(rng), inputs)
                })
                .collect::<Vec<_>>();

            let layer = Layer {
                neurons,
                activation: spec.activation,
            };
            upstream = layer.output_signals();
            layers.push(layer);
        }

        Ok(Self {
            layers,
            input_signals,
            loss,
        })
    }

    /// Overwrites the external input signal values in order. Nothing is
    /// written when the length disagrees.
    pub fn set_input_signals(&mut self, values: ArrayView1<f64>) -> Result<&mut Self> {
        if values.len() != self.input_signals.len() {
            return Err(Error::ShapeMismatch {
                expected: self.input_signals.len(),
                got: values.len(),
            });
        }
        for (signal, &value) in self.input_signals.iter().zip(values.iter()) {
            signal.set(value);
        }
        Ok(self)
    }

    /// Propagates the current input signals through every layer in order.
    pub fn forward(&mut self) -> &mut Self {
        for layer in &mut self.layers {
            layer.forward();
        }
        self
    }

    /// Output values of the last layer, as of the most recent forward pass.
    pub fn output(&self) -> Array1<f64> {
        // The constructor guarantees at least one layer.
        self.layers[self.layers.len() - 1].outputs()
    }

    /// One step of single-example gradient descent against `expected`.
    ///
    /// Deltas for every layer are computed first, from the output layer back;
    /// weights and biases are only touched afterwards, so the updates use the
    /// pre-update weights and signal values throughout.
    pub fn backward(&mut self, expected: ArrayView1<f64>, learning_rate: f64) -> Result<&mut Self> {
        let output = self.output();
        if expected.len() != output.len() {
            return Err(Error::ShapeMismatch {
                expected: output.len(),
                got: expected.len(),
            });
        }

        let loss_gradient = self.loss.derivative(output.view(), expected);

        // Deltas are collected output layer first, then reversed to line up
        // with `self.layers`.
        let mut deltas = Vec::with_capacity(self.layers.len());
        let output_layer = &self.layers[self.layers.len() - 1];
        let output_delta = if output_layer.activation == Activation::Softmax {
            // Combined Softmax+CrossEntropy shortcut: the loss gradient
            // already is the delta.
            loss_gradient
        } else {
            loss_gradient
                * output_layer
                    .activation
                    .derivative(output_layer.pre_activations().view())
        };
        deltas.push(output_delta);

        for index in (1..self.layers.len()).rev() {
            let layer = &self.layers[index - 1];
            let downstream = &self.layers[index];
            let downstream_deltas = &deltas[deltas.len() - 1];
            let error = downstream.backpropagated_error(layer.len(), downstream_deltas);
            let delta = layer.activation.derivative(layer.pre_activations().view()) * error;
            deltas.push(delta);
        }
        deltas.reverse();

        for (layer, layer_deltas) in self.layers.iter_mut().zip(&deltas) {
            for (neuron, &delta) in layer.neurons.iter_mut().zip(layer_deltas.iter()) {
                for connection in &mut neuron.inputs {
                    connection.weight -= learning_rate * delta * connection.signal.get();
                }
                neuron.bias -= learning_rate * delta;
            }
        }

        Ok(self)
    }

    /// Loss of the most recent forward pass against `expected`. Pure.
    pub fn calculate_loss(&self, expected: ArrayView1<f64>) -> Result<f64> {
        let output = self.output();
        if expected.len() != output.len() {
            return Err(Error::ShapeMismatch {
                expected: output.len(),
                got: expected.len(),
            });
        }
        Ok(self.loss.apply(output.view(), expected))
    }

    pub fn loss(&self) -> Loss {
        self.loss
    }

    /// Number of external input slots, which equals the first layer's neuron
    /// count.
    pub fn input_len(&self) -> usize {
        self.input_signals.len()
    }

    /// Number of output-layer neurons.
    pub fn output_len(&self) -> usize {
        self.layers[self.layers.len() - 1].len()
    }
}
