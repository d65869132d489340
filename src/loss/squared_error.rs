/// Half squared error, the loss the backward pass is derived from.
pub struct SquaredError;

impl SquaredError {
    /// Scalar loss for one output: (output - target)² / 2
    pub fn loss(output: f64, target: f64) -> f64 {
        (output - target).powi(2) / 2.0
    }

    /// Negative gradient of `loss` w.r.t. the output: target - output.
    ///
    /// A positive value means the network underestimated the target, which
    /// is why the weight update adds (rather than subtracts) its step.
    pub fn derivative(output: f64, target: f64) -> f64 {
        target - output
    }

    /// Summed loss over all outputs of one sample.
    pub fn total(outputs: &[f64], targets: &[f64]) -> f64 {
        outputs.iter().zip(targets.iter())
            .map(|(&o, &t)| Self::loss(o, t))
            .sum()
    }
}
