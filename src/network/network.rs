use log::{debug, log_enabled, trace, Level};
use rand::distributions::Open01;
use rand::Rng;

use crate::activation::Activation;
use crate::error::{alloc_zeroed, Result};
use crate::network::shape::Shape;

/// A fully connected feed-forward network stored in three flat buffers.
///
/// - `weight`: every connection weight, addressed through [`Shape`] offsets.
/// - `output`: the last input vector followed by every neuron's output.
/// - `delta`:  the error signal of every non-input neuron from the last
///   `train` call.
///
/// The buffers are allocated together and dropped together; cloning or
/// [`duplicate`](Network::duplicate)-ing copies all three.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    shape: Shape,
    activation_hidden: Activation,
    activation_output: Activation,
    total_weights: usize,
    total_neurons: usize,
    weight: Vec<f64>,
    output: Vec<f64>,
    delta: Vec<f64>,
}

impl Network {
    /// Builds a network with weights drawn from the thread-local generator.
    pub fn new(inputs: usize, hidden_layers: usize, hidden: usize, outputs: usize) -> Result<Network> {
        let shape = Shape::new(inputs, hidden_layers, hidden, outputs)?;
        Network::with_rng(shape, &mut rand::thread_rng())
    }

    /// Builds a network with weights drawn from `rng`.
    pub fn with_rng<R: Rng + ?Sized>(shape: Shape, rng: &mut R) -> Result<Network> {
        let mut net = Network::zeroed(shape)?;
        net.randomize_with(rng);
        Ok(net)
    }

    /// Builds a network whose weights are all zero.
    pub fn zeroed(shape: Shape) -> Result<Network> {
        let shape = shape.validate()?;
        let weight = alloc_zeroed(shape.total_weights())?;
        Network::from_parts(shape, Activation::default(), Activation::default(), weight)
    }

    /// Assembles a network around an existing weight buffer of the right
    /// length, allocating zeroed output and delta buffers.
    pub(crate) fn from_parts(
        shape: Shape,
        activation_hidden: Activation,
        activation_output: Activation,
        weight: Vec<f64>,
    ) -> Result<Network> {
        debug_assert_eq!(weight.len(), shape.total_weights());
        let total_neurons = shape.total_neurons();
        let output = alloc_zeroed(total_neurons)?;
        let delta = alloc_zeroed(shape.total_deltas())?;
        debug!(
            "allocated network {}-{}x{}-{}: {} weights, {} neurons",
            shape.inputs, shape.hidden_layers, shape.hidden, shape.outputs,
            weight.len(), total_neurons
        );
        Ok(Network {
            shape,
            activation_hidden,
            activation_output,
            total_weights: weight.len(),
            total_neurons,
            weight,
            output,
            delta,
        })
    }

    /// Redraws every weight from the thread-local generator.
    pub fn randomize(&mut self) {
        self.randomize_with(&mut rand::thread_rng());
    }

    /// Redraws every weight uniformly from the open interval (-1, 1).
    pub fn randomize_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for w in self.weight.iter_mut() {
            *w = rng.sample::<f64, _>(Open01) * 2.0 - 1.0;
        }
    }

    /// Deep copy of shape, activations and all three buffers, reporting
    /// allocation failure instead of aborting.
    pub fn duplicate(&self) -> Result<Network> {
        let mut weight = alloc_zeroed(self.total_weights)?;
        let mut output = alloc_zeroed(self.total_neurons)?;
        let mut delta = alloc_zeroed(self.delta.len())?;
        weight.copy_from_slice(&self.weight);
        output.copy_from_slice(&self.output);
        delta.copy_from_slice(&self.delta);
        debug!("duplicated network with {} weights", self.total_weights);
        Ok(Network { weight, output, delta, ..*self })
    }

    /// Feeds `inputs` forward and returns the output layer's values.
    ///
    /// The returned slice borrows the network, so it must be dropped (or
    /// copied) before the next `run` or `train`.
    ///
    /// # Panics
    /// Panics if `inputs.len()` differs from the network's input count.
    pub fn run(&mut self, inputs: &[f64]) -> &[f64] {
        assert_eq!(
            inputs.len(),
            self.shape.inputs,
            "run: expected {} inputs, got {}",
            self.shape.inputs,
            inputs.len()
        );
        self.output[..inputs.len()].copy_from_slice(inputs);

        let shape = self.shape;
        for layer in 0..shape.layer_count() {
            let act = self.layer_activation(layer);
            let width = shape.layer_width(layer);
            let stride = shape.stride(layer);
            let w_start = shape.weight_offset(layer);
            let weights = &self.weight[w_start..w_start + width * stride];

            // Sources sit immediately before this layer's own slots.
            let (head, tail) = self.output.split_at_mut(shape.neuron_offset(layer));
            let sources = &head[shape.source_offset(layer)..];

            for (neuron, w) in tail[..width].iter_mut().zip(weights.chunks_exact(stride)) {
                let sum = w[0] + w[1..].iter().zip(sources).map(|(w, x)| w * x).sum::<f64>();
                *neuron = act.function(sum);
            }
        }

        self.last_output()
    }

    /// One step of backpropagation on a single example.
    ///
    /// All deltas are computed from the weights as they were during the
    /// forward pass; only then is every weight moved by
    /// `rate * delta * source`.
    ///
    /// # Panics
    /// Panics if `inputs` or `desired` have the wrong length.
    pub fn train(&mut self, inputs: &[f64], desired: &[f64], rate: f64) {
        assert_eq!(
            desired.len(),
            self.shape.outputs,
            "train: expected {} desired outputs, got {}",
            self.shape.outputs,
            desired.len()
        );
        self.run(inputs);

        let shape = self.shape;
        let last = shape.hidden_layers;

        // Output layer.
        {
            let act = self.activation_output;
            let out = &self.output[shape.neuron_offset(last)..];
            let deltas = &mut self.delta[shape.delta_offset(last)..];
            for ((d, &o), &t) in deltas.iter_mut().zip(out).zip(desired) {
                *d = (t - o) * act.derivative_from_output(o);
            }
        }

        // Hidden layers, last to first.
        for layer in (0..last).rev() {
            let act = self.activation_hidden;
            let next = layer + 1;
            let next_width = shape.layer_width(next);
            let next_stride = shape.stride(next);
            let next_start = shape.weight_offset(next);
            let next_weights = &self.weight[next_start..next_start + next_width * next_stride];

            let (lower, upper) = self.delta.split_at_mut(shape.delta_offset(next));
            let next_deltas = &upper[..next_width];
            let deltas = &mut lower[shape.delta_offset(layer)..];
            let out = &self.output[shape.neuron_offset(layer)..][..shape.hidden];

            for (j, (d, &o)) in deltas.iter_mut().zip(out).enumerate() {
                let downstream: f64 = next_weights
                    .chunks_exact(next_stride)
                    .zip(next_deltas)
                    .map(|(w, nd)| w[j + 1] * nd)
                    .sum();
                *d = act.derivative_from_output(o) * downstream;
            }
        }

        if log_enabled!(Level::Trace) {
            let sq_err: f64 = self.last_output().iter().zip(desired)
                .map(|(o, t)| (t - o).powi(2))
                .sum();
            trace!("train: rate={rate} squared_error={sq_err:.6}");
        }

        // Weight update.
        for layer in 0..shape.layer_count() {
            let width = shape.layer_width(layer);
            let stride = shape.stride(layer);
            let w_start = shape.weight_offset(layer);
            let src = shape.source_offset(layer);
            let sources = &self.output[src..src + shape.layer_fan_in(layer)];
            let deltas = &self.delta[shape.delta_offset(layer)..][..width];
            let weights = &mut self.weight[w_start..w_start + width * stride];

            for (w, &d) in weights.chunks_exact_mut(stride).zip(deltas) {
                let step = rate * d;
                w[0] += step;
                for (wk, &x) in w[1..].iter_mut().zip(sources) {
                    *wk += step * x;
                }
            }
        }
    }

    fn layer_activation(&self, layer: usize) -> Activation {
        if layer == self.shape.hidden_layers {
            self.activation_output
        } else {
            self.activation_hidden
        }
    }

    pub fn shape(&self) -> Shape { self.shape }
    pub fn inputs(&self) -> usize { self.shape.inputs }
    pub fn hidden_layers(&self) -> usize { self.shape.hidden_layers }
    pub fn hidden(&self) -> usize { self.shape.hidden }
    pub fn outputs(&self) -> usize { self.shape.outputs }
    pub fn total_weights(&self) -> usize { self.total_weights }
    pub fn total_neurons(&self) -> usize { self.total_neurons }

    pub fn activation_hidden(&self) -> Activation { self.activation_hidden }
    pub fn activation_output(&self) -> Activation { self.activation_output }

    /// Takes effect on the next `run` or `train`.
    pub fn set_activation_hidden(&mut self, activation: Activation) {
        self.activation_hidden = activation;
    }

    /// Takes effect on the next `run` or `train`.
    pub fn set_activation_output(&mut self, activation: Activation) {
        self.activation_output = activation;
    }

    /// All weights in layout order.
    pub fn weights(&self) -> &[f64] { &self.weight }

    /// Mutable weights; the length is fixed by the shape.
    pub fn weights_mut(&mut self) -> &mut [f64] { &mut self.weight }

    /// Last inputs followed by every neuron's output from the last pass.
    pub fn neuron_outputs(&self) -> &[f64] { &self.output }

    /// Deltas from the last `train` call, non-input neurons only.
    pub fn deltas(&self) -> &[f64] { &self.delta }

    /// Output layer values from the last pass, without running again.
    pub fn last_output(&self) -> &[f64] {
        &self.output[self.total_neurons - self.shape.outputs..]
    }
}
