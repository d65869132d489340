use crate::train::Sample;

/// The four-row XOR truth table, in presentation order.
pub fn xor_table() -> Vec<Sample> {
    vec![
        Sample::new(vec![0.0, 1.0], vec![1.0]),
        Sample::new(vec![1.0, 0.0], vec![1.0]),
        Sample::new(vec![1.0, 1.0], vec![0.0]),
        Sample::new(vec![0.0, 0.0], vec![0.0]),
    ]
}
