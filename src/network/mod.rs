pub mod connection;
pub mod network;
pub mod neuron;

pub use connection::{Connection, ConnectionId};
pub use network::Network;
pub use neuron::{Neuron, NeuronId};
