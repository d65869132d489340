use graphnet::{
    evaluate, parse_idx_pair, train_loop, Activation, Network, NetworkError, Sample,
    SquaredError, TrainConfig,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Builds an IDX pair of 2x2 "images": class 0 lights the left column,
/// class 1 the right column.
fn column_images() -> (Vec<u8>, Vec<u8>) {
    let patterns: [([u8; 4], u8); 4] = [
        ([255, 0, 255, 0], 0),
        ([0, 255, 0, 255], 1),
        ([200, 10, 230, 0], 0),
        ([0, 220, 15, 240], 1),
    ];

    let mut images = vec![0x00, 0x00, 0x08, 0x03];
    images.extend_from_slice(&(patterns.len() as u32).to_be_bytes());
    images.extend_from_slice(&2u32.to_be_bytes());
    images.extend_from_slice(&2u32.to_be_bytes());
    let mut labels = vec![0x00, 0x00, 0x08, 0x01];
    labels.extend_from_slice(&(patterns.len() as u32).to_be_bytes());

    for (pixels, label) in patterns {
        images.extend_from_slice(&pixels);
        labels.push(label);
    }
    (images, labels)
}

#[test]
fn classifies_idx_images_after_training() {
    let (images, labels) = column_images();
    let samples = parse_idx_pair(&images, &labels, 2).unwrap();

    let mut network = Network::seeded(&[4, 5, 2], Activation::Sigmoid, 21).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(21);

    let before = evaluate(&mut network, &samples).unwrap();
    let last = train_loop(&mut network, &samples, &TrainConfig::new(3_000, 0.5), &mut rng)
        .unwrap()
        .unwrap();
    let after = evaluate(&mut network, &samples).unwrap();

    assert_eq!(last.epoch, 3_000);
    assert!(after.loss < before.loss);
    assert_eq!(after.correct, after.total);
}

#[test]
fn gradient_step_moves_single_weight_downhill() {
    for &(target, start) in &[(1.0, 0.2), (0.0, 0.8)] {
        let mut network = Network::seeded(&[1, 1], Activation::Sigmoid, 0).unwrap();
        let edge = network.layers()[1][0].input_edges()[0];
        network.set_weight(edge, start).unwrap();

        let sample = Sample::new(vec![1.0], vec![target]);
        let before = SquaredError::total(&network.predict(&sample.input).unwrap(), &sample.output);
        network.train(&sample, 0.001).unwrap();
        let after = SquaredError::total(&network.predict(&sample.input).unwrap(), &sample.output);

        assert!(after < before, "target {target}: loss {before} -> {after}");
    }
}

#[test]
fn relu_network_rejects_wrong_width_sample() {
    let mut network = Network::seeded(&[3, 4, 2], Activation::ReLU, 5).unwrap();
    let err = network.train(&Sample::new(vec![1.0, 2.0, 3.0], vec![1.0]), 0.1).unwrap_err();
    assert_eq!(
        err,
        NetworkError::ShapeMismatch { what: "target", expected: 2, actual: 1 }
    );
    assert!(err.to_string().contains("expected 2 values, got 1"));
}
