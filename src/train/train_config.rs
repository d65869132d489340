use std::sync::mpsc;

use crate::train::epoch_stats::EpochStats;

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `epochs`        — total number of full passes over the training data
/// - `learning_rate` — step size of every per-sample update
/// - `shuffle`       — visit samples in a fresh random order every epoch
///                     instead of dataset order
/// - `report_every`  — log every N-th epoch at `info` level (the final epoch
///                     is always logged); `0` logs only the final epoch
/// - `progress_tx`   — optional channel sender; one `EpochStats` is sent per
///                     completed epoch.  If the receiver is dropped the loop
///                     terminates early.
pub struct TrainConfig {
    pub epochs: usize,
    pub learning_rate: f64,
    pub shuffle: bool,
    pub report_every: usize,
    pub progress_tx: Option<mpsc::Sender<EpochStats>>,
}

impl TrainConfig {
    /// Creates an unshuffled `TrainConfig` with no progress channel.
    pub fn new(epochs: usize, learning_rate: f64) -> Self {
        TrainConfig {
            epochs,
            learning_rate,
            shuffle: false,
            report_every: 1,
            progress_tx: None,
        }
    }
}
