use graphnet::{xor_table, Network, SquaredError};

fn main() {
    let mut rng = rand::thread_rng();
    let mut network = Network::new(&[2, 6, 4, 1], &mut rng)
        .expect("2-6-4-1 is a valid shape");

    let samples = xor_table();
    let learning_rate = 0.1;
    let epochs = 100_000;

    for epoch in 0..epochs {
        let mut loss = 0.0;
        for sample in &samples {
            let output = network.train(sample, learning_rate).expect("XOR rows match the network");
            loss += SquaredError::total(&output, &sample.output);
        }
        if epoch % 10_000 == 0 {
            println!("Epoch {epoch}: loss = {:.6}", loss / samples.len() as f64);
        }
    }

    for sample in &samples {
        let output = network.predict(&sample.input).expect("XOR rows match the network");
        println!("Input: {:?} -> Output: {:.4}", sample.input, output[0]);
    }
}
