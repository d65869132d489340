use std::time::Instant;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

use crate::error::NetworkResult;
use crate::loss::SquaredError;
use crate::network::network::Network;
use crate::train::epoch_stats::{EpochStats, Evaluation};
use crate::train::sample::Sample;
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Trains `network` for `config.epochs` epochs of online SGD and returns the
/// statistics of the **last completed epoch** (`None` if no epoch ran).
///
/// Every sample is presented once per epoch through `Network::train`, in
/// dataset order unless `config.shuffle` is set, in which case `rng` draws a
/// new order each epoch.
///
/// # Early termination
/// The loop breaks early if the `progress_tx` receiver has been dropped.
///
/// # Errors
/// The first sample whose widths do not match the network aborts the run
/// with `NetworkError::ShapeMismatch`.
pub fn train_loop<R: Rng + ?Sized>(
    network: &mut Network,
    samples: &[Sample],
    config: &TrainConfig,
    rng: &mut R,
) -> NetworkResult<Option<EpochStats>> {
    let mut last = None;
    let mut correct_total = 0usize;
    let mut seen_total = 0usize;
    let mut order: Vec<usize> = (0..samples.len()).collect();

    for epoch in 1..=config.epochs {
        let t_start = Instant::now();

        if config.shuffle {
            order.shuffle(rng);
        }

        // ── One full pass over the training data ───────────────────────────
        let mut total_loss = 0.0;
        let mut correct = 0usize;
        for &idx in &order {
            let sample = &samples[idx];
            let output = network.train(sample, config.learning_rate)?;
            total_loss += SquaredError::total(&output, &sample.output);
            if argmax(&output) == argmax(&sample.output) {
                correct += 1;
            }
        }

        correct_total += correct;
        seen_total += samples.len();

        let n = samples.len().max(1) as f64;
        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            train_loss: total_loss / n,
            train_accuracy: correct as f64 / n,
            correct_total,
            seen_total,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };

        if should_report(epoch, config) {
            info!(
                epoch,
                total_epochs = config.epochs,
                loss = stats.train_loss,
                accuracy = stats.train_accuracy,
                running_accuracy = stats.cumulative_accuracy(),
                elapsed_ms = stats.elapsed_ms,
                "epoch complete"
            );
        } else {
            debug!(epoch, loss = stats.train_loss, "epoch complete");
        }

        last = Some(stats.clone());

        if let Some(ref tx) = config.progress_tx {
            // If the receiver has been dropped, stop training.
            if tx.send(stats).is_err() {
                debug!(epoch, "progress receiver dropped, stopping");
                break;
            }
        }
    }

    Ok(last)
}

/// Predict-only pass: mean loss and argmax matches over `samples`.
/// Performs no learning.
pub fn evaluate(network: &mut Network, samples: &[Sample]) -> NetworkResult<Evaluation> {
    let mut total_loss = 0.0;
    let mut correct = 0usize;
    for sample in samples {
        let output = network.predict(&sample.input)?;
        total_loss += SquaredError::total(&output, &sample.output);
        if argmax(&output) == argmax(&sample.output) {
            correct += 1;
        }
    }

    let loss = if samples.is_empty() { 0.0 } else { total_loss / samples.len() as f64 };
    Ok(Evaluation { loss, correct, total: samples.len() })
}

/// Index of the first maximum element in a slice (0 for an empty slice).
pub fn argmax(v: &[f64]) -> usize {
    let mut best = 0;
    for (i, &x) in v.iter().enumerate() {
        if x > v[best] {
            best = i;
        }
    }
    best
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn should_report(epoch: usize, config: &TrainConfig) -> bool {
    if epoch == config.epochs {
        return true;
    }
    config.report_every > 0 && epoch % config.report_every == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use crate::activation::Activation;
    use crate::error::NetworkError;

    fn or_table() -> Vec<Sample> {
        vec![
            Sample::new(vec![0.0, 0.0], vec![0.0]),
            Sample::new(vec![0.0, 1.0], vec![1.0]),
            Sample::new(vec![1.0, 0.0], vec![1.0]),
            Sample::new(vec![1.0, 1.0], vec![1.0]),
        ]
    }

    #[test]
    fn argmax_picks_first_maximum() {
        assert_eq!(argmax(&[0.1, 0.9, 0.3]), 1);
        assert_eq!(argmax(&[0.5, 0.5, 0.2]), 0);
        assert_eq!(argmax(&[]), 0);
    }

    #[test]
    fn sends_one_stats_per_epoch() {
        let mut net = Network::seeded(&[2, 3, 1], Activation::Sigmoid, 2).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let (tx, rx) = mpsc::channel();
        let mut config = TrainConfig::new(5, 0.5);
        config.progress_tx = Some(tx);

        let last = train_loop(&mut net, &or_table(), &config, &mut rng).unwrap().unwrap();
        drop(config);

        let received: Vec<EpochStats> = rx.iter().collect();
        assert_eq!(received.len(), 5);
        assert_eq!(received[0].epoch, 1);
        assert_eq!(last.epoch, 5);
        assert_eq!(received[4], last);
        assert!(received.iter().all(|s| s.total_epochs == 5));
    }

    #[test]
    fn running_tally_spans_all_epochs() {
        let samples = vec![
            Sample::new(vec![0.0, 0.0], vec![1.0, 0.0]),
            Sample::new(vec![0.0, 1.0], vec![0.0, 1.0]),
            Sample::new(vec![1.0, 0.0], vec![0.0, 1.0]),
            Sample::new(vec![1.0, 1.0], vec![0.0, 1.0]),
        ];
        let mut net = Network::seeded(&[2, 3, 2], Activation::Sigmoid, 12).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let (tx, rx) = mpsc::channel();
        let mut config = TrainConfig::new(3, 0.5);
        config.progress_tx = Some(tx);

        train_loop(&mut net, &samples, &config, &mut rng).unwrap();
        drop(config);

        let mut correct = 0usize;
        for stats in rx.iter() {
            correct += (stats.train_accuracy * 4.0).round() as usize;
            assert_eq!(stats.seen_total, stats.epoch * 4);
            assert_eq!(stats.correct_total, correct);
            assert_relative_eq!(stats.cumulative_accuracy(), correct as f64 / stats.seen_total as f64);
        }
    }

    #[test]
    fn stops_when_receiver_is_dropped() {
        let mut net = Network::seeded(&[2, 3, 1], Activation::Sigmoid, 2).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let mut config = TrainConfig::new(1_000, 0.5);
        config.progress_tx = Some(tx);

        let last = train_loop(&mut net, &or_table(), &config, &mut rng).unwrap().unwrap();
        assert_eq!(last.epoch, 1);
    }

    #[test]
    fn zero_epochs_leaves_network_unchanged() {
        let mut net = Network::seeded(&[2, 2, 1], Activation::Sigmoid, 4).unwrap();
        let before = net.predict(&[1.0, 0.0]).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let last = train_loop(&mut net, &or_table(), &TrainConfig::new(0, 0.5), &mut rng).unwrap();
        assert!(last.is_none());
        assert_eq!(net.predict(&[1.0, 0.0]).unwrap(), before);
    }

    #[test]
    fn shuffled_runs_are_reproducible_from_the_seed() {
        let mut config = TrainConfig::new(20, 0.5);
        config.shuffle = true;

        let run = |seed: u64| {
            let mut net = Network::seeded(&[2, 3, 1], Activation::Sigmoid, 8).unwrap();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            train_loop(&mut net, &or_table(), &config, &mut rng).unwrap();
            net.predict(&[0.0, 1.0]).unwrap()
        };

        assert_eq!(run(3), run(3));
    }

    #[test]
    fn training_lowers_loss_on_a_linearly_separable_table() {
        let mut net = Network::seeded(&[2, 3, 1], Activation::Sigmoid, 6).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let samples = or_table();

        let before = evaluate(&mut net, &samples).unwrap();
        train_loop(&mut net, &samples, &TrainConfig::new(2_000, 0.5), &mut rng).unwrap();
        let after = evaluate(&mut net, &samples).unwrap();

        assert!(after.loss < before.loss);
        assert_eq!(after.total, 4);
        assert!(net.predict(&[0.0, 0.0]).unwrap()[0] < 0.5);
        assert!(net.predict(&[1.0, 1.0]).unwrap()[0] > 0.5);
    }

    #[test]
    fn mismatched_sample_aborts_the_run() {
        let mut net = Network::seeded(&[2, 1], Activation::Sigmoid, 0).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let samples = vec![Sample::new(vec![1.0, 0.0, 1.0], vec![1.0])];

        let err = train_loop(&mut net, &samples, &TrainConfig::new(3, 0.1), &mut rng).unwrap_err();
        assert!(matches!(err, NetworkError::ShapeMismatch { what: "input", expected: 2, actual: 3 }));
    }

    #[test]
    fn evaluation_of_empty_dataset_is_zero() {
        let mut net = Network::seeded(&[2, 1], Activation::Sigmoid, 0).unwrap();
        let eval = evaluate(&mut net, &[]).unwrap();
        assert_eq!(eval.total, 0);
        assert_eq!(eval.loss, 0.0);
        assert_relative_eq!(eval.accuracy(), 0.0);
    }
}
