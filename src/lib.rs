pub mod activation;
pub mod config;
pub mod data;
pub mod error;
pub mod loss;
pub mod network;
pub mod train;

// Convenience re-exports
pub use activation::Activation;
pub use config::RunConfig;
pub use data::{load_idx_pair, parse_idx_pair, xor_table};
pub use error::{ConfigError, DatasetError, NetworkError, NetworkResult};
pub use loss::SquaredError;
pub use network::{Connection, ConnectionId, Network, Neuron, NeuronId};
pub use train::{argmax, evaluate, train_loop, EpochStats, Evaluation, Sample, TrainConfig};
