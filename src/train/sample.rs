use serde::{Serialize, Deserialize};

/// One training example: an input vector and the target output vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub input: Vec<f64>,
    pub output: Vec<f64>,
}

impl Sample {
    pub fn new(input: Vec<f64>, output: Vec<f64>) -> Sample {
        Sample { input, output }
    }
}
