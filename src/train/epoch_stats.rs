use serde::{Serialize, Deserialize};

/// Per-epoch training statistics emitted by `train_loop`.
///
/// When a `progress_tx` channel is configured in `TrainConfig`, the training
/// loop sends one `EpochStats` value at the end of every completed epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    /// Mean squared-error loss over the samples of this epoch, measured on
    /// the outputs each `train` call produced before its update.
    pub train_loss: f64,
    /// Fraction of samples in this epoch whose output argmax matched the
    /// target argmax.
    pub train_accuracy: f64,
    /// Argmax matches counted since the first epoch of the run.
    pub correct_total: usize,
    /// Samples presented since the first epoch of the run.
    pub seen_total: usize,
    /// Wall-clock duration of this single epoch in milliseconds.
    pub elapsed_ms: u64,
}

impl EpochStats {
    /// Running training accuracy over every sample presented so far.
    pub fn cumulative_accuracy(&self) -> f64 {
        if self.seen_total == 0 {
            return 0.0;
        }
        self.correct_total as f64 / self.seen_total as f64
    }
}

/// Result of a predict-only pass over a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub loss: f64,
    pub correct: usize,
    pub total: usize,
}

impl Evaluation {
    /// `correct / total`, or 0 for an empty dataset.
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct as f64 / self.total as f64
    }
}
