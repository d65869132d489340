use crate::network::neuron::NeuronId;

/// Index of a connection in the network's connection arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub usize);

/// A weighted edge from a neuron in layer L-1 to a neuron in layer L.
#[derive(Debug, Clone)]
pub struct Connection {
    pub(crate) source: NeuronId,
    pub(crate) destination: NeuronId,
    pub(crate) weight: f64,
}

impl Connection {
    pub(crate) fn new(source: NeuronId, destination: NeuronId, weight: f64) -> Connection {
        Connection { source, destination, weight }
    }

    pub fn source(&self) -> NeuronId { self.source }
    pub fn destination(&self) -> NeuronId { self.destination }
    pub fn weight(&self) -> f64 { self.weight }

    /// Diagnostic label, e.g. `0_1-1_0`.  Never used for lookup.
    pub fn label(&self) -> String {
        format!("{}-{}", self.source, self.destination)
    }
}
