use ndarray::Array1;

use crate::activation::Activation;
use crate::neuron::Neuron;
use crate::signal::Signal;

/// Neuron count and activation function for one layer of a network under
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerSpec {
    pub neurons: usize,
    pub activation: Activation,
}

impl LayerSpec {
    pub fn new(neurons: usize, activation: Activation) -> Self {
        Self {
            neurons,
            activation,
        }
    }
}

/// An ordered collection of neurons sharing one activation function.
pub struct Layer {
    pub(crate) neurons: Vec<Neuron>,
    pub(crate) activation: Activation,
}

impl Layer {
    /// Computes every neuron's pre-activation, applies the activation function
    /// to the whole vector at once and publishes the results on the neurons'
    /// output signals.
    pub(crate) fn forward(&mut self) {
        let pre_activations = self
            .neurons
            .iter_mut()
            .map(Neuron::pre_activate)
            .collect::<Array1<f64>>();
        let outputs = self.activation.apply(pre_activations.view());
        for (neuron, &output) in self.neurons.iter().zip(outputs.iter()) {
            neuron.output.set(output);
        }
    }

    pub(crate) fn outputs(&self) -> Array1<f64> {
        self.neurons
            .iter()
            .map(|neuron| neuron.output.get())
            .collect()
    }

    pub(crate) fn pre_activations(&self) -> Array1<f64> {
        self.neurons
            .iter()
            .map(|neuron| neuron.pre_activation)
            .collect()
    }

    /// Read handles on every neuron's output signal, in neuron order. The next
    /// layer connects to these.
    pub(crate) fn output_signals(&self) -> Vec<Signal> {
        self.neurons
            .iter()
            .map(|neuron| neuron.output.clone())
            .collect()
    }

    /// Per-upstream-neuron error: `sum_k weight_{k<-j} * delta_k` over this
    /// layer's neurons `k`, for each upstream index `j`.
    pub(crate) fn backpropagated_error(
        &self,
        upstream_len: usize,
        deltas: &Array1<f64>,
    ) -> Array1<f64> {
        (0..upstream_len)
            .map(|j| {
                self.neurons
                    .iter()
                    .zip(deltas.iter())
                    .map(|(neuron, delta)| neuron.inputs[j].weight * delta)
                    .sum()
            })
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.neurons.len()
    }
}
