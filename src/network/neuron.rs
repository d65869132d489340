use std::fmt;

use crate::activation::Activation;
use crate::network::connection::ConnectionId;

/// Stable label of a neuron: its layer and its position within that layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NeuronId {
    pub layer: usize,
    pub position: usize,
}

impl NeuronId {
    pub fn new(layer: usize, position: usize) -> Self {
        NeuronId { layer, position }
    }
}

impl fmt::Display for NeuronId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.layer, self.position)
    }
}

/// One node of the graph.
///
/// `raw_input`, `output` and `delta` are scratch values overwritten by every
/// forward or backward pass.  The edge lists hold ids into the network's
/// connection arena; the connections themselves belong to the network.
#[derive(Debug, Clone)]
pub struct Neuron {
    pub(crate) id: NeuronId,
    pub(crate) bias: f64,
    pub(crate) activation: Activation,
    pub(crate) raw_input: f64,
    pub(crate) output: f64,
    pub(crate) delta: f64,
    pub(crate) input_edges: Vec<ConnectionId>,
    pub(crate) output_edges: Vec<ConnectionId>,
}

impl Neuron {
    pub(crate) fn new(id: NeuronId, bias: f64, activation: Activation) -> Neuron {
        Neuron {
            id,
            bias,
            activation,
            raw_input: 0.0,
            output: 0.0,
            delta: 0.0,
            input_edges: Vec::new(),
            output_edges: Vec::new(),
        }
    }

    pub fn id(&self) -> NeuronId { self.id }
    pub fn bias(&self) -> f64 { self.bias }
    pub fn activation(&self) -> Activation { self.activation }
    pub fn raw_input(&self) -> f64 { self.raw_input }
    pub fn output(&self) -> f64 { self.output }
    pub fn delta(&self) -> f64 { self.delta }

    /// Connections terminating at this neuron, in source-position order.
    pub fn input_edges(&self) -> &[ConnectionId] { &self.input_edges }

    /// Connections originating from this neuron, in destination-position order.
    pub fn output_edges(&self) -> &[ConnectionId] { &self.output_edges }
}
