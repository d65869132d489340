use rand::distributions::{Distribution, Uniform};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use crate::activation::Activation;
use crate::error::{NetworkError, NetworkResult};
use crate::loss::SquaredError;
use crate::network::connection::{Connection, ConnectionId};
use crate::network::neuron::{Neuron, NeuronId};
use crate::train::Sample;

/// A fully connected feed-forward network stored as an explicit graph.
///
/// Neurons are grouped per layer; every connection lives in a single arena
/// and is referenced by id from both of its endpoints.  The topology is
/// fixed once `with_activation` returns.
///
/// Cached outputs and deltas are overwritten in place, so a `Network` must
/// be driven by one caller at a time.  Train independent samples in parallel
/// with independent networks.
#[derive(Debug, Clone)]
pub struct Network {
    layers: Vec<Vec<Neuron>>,
    connections: Vec<Connection>,
    activation: Activation,
}

impl Network {
    /// Builds a sigmoid network from per-layer widths (input layer first).
    pub fn new<R: Rng + ?Sized>(shape: &[usize], rng: &mut R) -> NetworkResult<Network> {
        Self::with_activation(shape, Activation::default(), rng)
    }

    /// Builds a network whose parameters are drawn from a ChaCha8 stream
    /// seeded with `seed`.  Equal seeds give bit-identical networks.
    pub fn seeded(shape: &[usize], activation: Activation, seed: u64) -> NetworkResult<Network> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Self::with_activation(shape, activation, &mut rng)
    }

    /// Builds a network from per-layer widths.
    ///
    /// Every bias and weight is drawn uniformly from [0, 1).  Each neuron of
    /// layer L > 0 receives one connection from every neuron of layer L-1.
    pub fn with_activation<R: Rng + ?Sized>(
        shape: &[usize],
        activation: Activation,
        rng: &mut R,
    ) -> NetworkResult<Network> {
        validate_shape(shape)?;
        let unit: Uniform<f64> = Uniform::new(0.0, 1.0);

        let mut layers: Vec<Vec<Neuron>> = Vec::with_capacity(shape.len());
        let mut connections = Vec::new();

        for (layer_idx, &width) in shape.iter().enumerate() {
            let mut layer = Vec::with_capacity(width);
            for position in 0..width {
                let id = NeuronId::new(layer_idx, position);
                let mut neuron = Neuron::new(id, unit.sample(rng), activation);

                if layer_idx > 0 {
                    for prev in layers[layer_idx - 1].iter_mut() {
                        let edge = ConnectionId(connections.len());
                        connections.push(Connection::new(prev.id, id, unit.sample(rng)));
                        prev.output_edges.push(edge);
                        neuron.input_edges.push(edge);
                    }
                }
                layer.push(neuron);
            }
            layers.push(layer);
        }

        debug!(?shape, ?activation, connections = connections.len(), "built network");

        Ok(Network { layers, connections, activation })
    }

    /// Propagates `input` through the graph, caching raw inputs and outputs.
    ///
    /// Layer 0 copies the input verbatim; no activation is applied to it.
    pub fn forward(&mut self, input: &[f64]) -> NetworkResult<()> {
        check_len("input", self.layers[0].len(), input.len())?;

        for (neuron, &value) in self.layers[0].iter_mut().zip(input) {
            neuron.raw_input = value;
            neuron.output = value;
        }

        let connections = &self.connections;
        for l in 1..self.layers.len() {
            let (upstream, rest) = self.layers.split_at_mut(l);
            let previous = &upstream[l - 1];
            for neuron in rest[0].iter_mut() {
                let sum = neuron.input_edges.iter().fold(neuron.bias, |acc, &edge| {
                    let conn = &connections[edge.0];
                    acc + conn.weight * previous[conn.source.position].output
                });
                neuron.raw_input = sum;
                neuron.output = neuron.activation.function(sum);
            }
        }
        Ok(())
    }

    /// Computes every non-input neuron's delta from the cached outputs of
    /// the last forward pass, output layer first.
    pub fn backward(&mut self, target: &[f64]) -> NetworkResult<()> {
        let last = self.layers.len() - 1;
        check_len("target", self.layers[last].len(), target.len())?;

        let connections = &self.connections;
        for l in (1..=last).rev() {
            let (current, downstream) = self.layers.split_at_mut(l + 1);
            // Layer l+1 is finalized before layer l reads it.
            let next = downstream.first();
            for (position, neuron) in current[l].iter_mut().enumerate() {
                let error = match next {
                    None => SquaredError::derivative(neuron.output, target[position]),
                    Some(next) => neuron.output_edges.iter()
                        .map(|&edge| {
                            let conn = &connections[edge.0];
                            conn.weight * next[conn.destination.position].delta
                        })
                        .sum::<f64>(),
                };
                // The derivative is taken at the activated output, not the raw input.
                neuron.delta = error * neuron.activation.derivative(neuron.output);
            }
        }
        Ok(())
    }

    /// Moves every weight and bias along its neuron's delta.
    ///
    /// Must follow a `backward` computed from the same forward pass; stale
    /// deltas produce wrong updates without failing.
    pub fn update_weights(&mut self, learning_rate: f64) {
        let connections = &mut self.connections;
        for l in 1..self.layers.len() {
            let (upstream, rest) = self.layers.split_at_mut(l);
            let previous = &upstream[l - 1];
            for neuron in rest[0].iter_mut() {
                let step = learning_rate * neuron.delta;
                for &edge in &neuron.input_edges {
                    let conn = &mut connections[edge.0];
                    conn.weight += step * previous[conn.source.position].output;
                }
                neuron.bias += step;
            }
        }
    }

    /// One stochastic gradient step on one sample; returns the outputs
    /// produced by the forward pass of this step.
    pub fn train(&mut self, sample: &Sample, learning_rate: f64) -> NetworkResult<Vec<f64>> {
        // Checked before forward: a rejected sample mutates nothing.
        check_len("target", self.output_width(), sample.output.len())?;

        self.forward(&sample.input)?;
        self.backward(&sample.output)?;
        self.update_weights(learning_rate);

        let result = self.result();
        trace!(loss = SquaredError::total(&result, &sample.output), "train step");
        Ok(result)
    }

    /// Runs a forward pass only and returns the output layer.
    pub fn predict(&mut self, input: &[f64]) -> NetworkResult<Vec<f64>> {
        self.forward(input)?;
        Ok(self.result())
    }

    /// Current output-layer values, without recomputation.
    pub fn result(&self) -> Vec<f64> {
        self.layers[self.layers.len() - 1].iter()
            .map(|neuron| neuron.output)
            .collect()
    }

    pub fn shape(&self) -> Vec<usize> {
        self.layers.iter().map(Vec::len).collect()
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn input_width(&self) -> usize {
        self.layers[0].len()
    }

    pub fn output_width(&self) -> usize {
        self.layers[self.layers.len() - 1].len()
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }

    pub fn layers(&self) -> &[Vec<Neuron>] {
        &self.layers
    }

    pub fn neuron(&self, id: NeuronId) -> Option<&Neuron> {
        self.layers.get(id.layer)?.get(id.position)
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.get(id.0)
    }

    /// Overwrites one connection weight.
    pub fn set_weight(&mut self, id: ConnectionId, weight: f64) -> NetworkResult<()> {
        let conn = self.connections.get_mut(id.0)
            .ok_or(NetworkError::UnknownConnection(id))?;
        conn.weight = weight;
        Ok(())
    }

    /// Overwrites one neuron bias.
    pub fn set_bias(&mut self, id: NeuronId, bias: f64) -> NetworkResult<()> {
        let neuron = self.layers.get_mut(id.layer)
            .and_then(|layer| layer.get_mut(id.position))
            .ok_or(NetworkError::UnknownNeuron(id))?;
        neuron.bias = bias;
        Ok(())
    }
}

fn validate_shape(shape: &[usize]) -> NetworkResult<()> {
    if shape.is_empty() {
        return Err(NetworkError::InvalidShape {
            shape: Vec::new(),
            reason: "at least one layer is required".to_owned(),
        });
    }
    if let Some(layer) = shape.iter().position(|&width| width == 0) {
        return Err(NetworkError::InvalidShape {
            shape: shape.to_vec(),
            reason: format!("layer {} has no neurons", layer),
        });
    }
    Ok(())
}

fn check_len(what: &'static str, expected: usize, actual: usize) -> NetworkResult<()> {
    if expected != actual {
        return Err(NetworkError::ShapeMismatch { what, expected, actual });
    }
    Ok(())
}
