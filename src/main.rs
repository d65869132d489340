// Thin driver over the library: dataset loading, epoch loop and reporting.
// Run with:
//   cargo run --release -- xor
//   cargo run --release -- digits --train-images … --train-labels … \
//       --test-images … --test-labels …
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use graphnet::{
    evaluate, load_idx_pair, train_loop, xor_table, Network, RunConfig, Sample, TrainConfig,
};

#[derive(Parser)]
#[command(name = "graphnet", version, about = "Train a node/edge graph neural network")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Learn the XOR truth table and print the prediction for every row.
    Xor(RunArgs),
    /// Learn handwritten digits from MNIST IDX files and report test accuracy.
    Digits(DigitsArgs),
}

#[derive(Args)]
struct RunArgs {
    /// JSON file with any of: shape, activation, learning_rate, epochs, seed, shuffle
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    epochs: Option<usize>,
    #[arg(long)]
    learning_rate: Option<f64>,
    /// Present samples in a new random order every epoch.
    #[arg(long)]
    shuffle: bool,
}

#[derive(Args)]
struct DigitsArgs {
    #[command(flatten)]
    run: RunArgs,
    #[arg(long)]
    train_images: PathBuf,
    #[arg(long)]
    train_labels: PathBuf,
    #[arg(long)]
    test_images: PathBuf,
    #[arg(long)]
    test_labels: PathBuf,
    #[arg(long, default_value_t = 8000)]
    train_size: usize,
    #[arg(long, default_value_t = 800)]
    test_size: usize,
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    match Cli::parse().command {
        Command::Xor(args) => run_xor(&args),
        Command::Digits(args) => run_digits(&args),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// File values first, then command-line overrides.
fn resolve_config(args: &RunArgs, base: RunConfig) -> anyhow::Result<RunConfig> {
    let mut config = match &args.config {
        Some(path) => RunConfig::load_json(path, base)?,
        None => base,
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(epochs) = args.epochs {
        config.epochs = epochs;
    }
    if let Some(learning_rate) = args.learning_rate {
        config.learning_rate = learning_rate;
    }
    config.shuffle |= args.shuffle;
    Ok(config)
}

fn build(config: &RunConfig, rng: &mut ChaCha8Rng) -> anyhow::Result<Network> {
    Network::with_activation(&config.shape, config.activation, rng)
        .with_context(|| format!("cannot build network of shape {:?}", config.shape))
}

fn train(
    network: &mut Network,
    samples: &[Sample],
    config: &RunConfig,
    report_every: usize,
    rng: &mut ChaCha8Rng,
) -> anyhow::Result<()> {
    let mut train_config = TrainConfig::new(config.epochs, config.learning_rate);
    train_config.shuffle = config.shuffle;
    train_config.report_every = report_every;

    info!(shape = ?config.shape, learning_rate = config.learning_rate, epochs = config.epochs, "training");
    train_loop(network, samples, &train_config, rng).context("training failed")?;
    Ok(())
}

fn run_xor(args: &RunArgs) -> anyhow::Result<()> {
    let config = resolve_config(args, RunConfig::xor())?;
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut network = build(&config, &mut rng)?;
    let samples = xor_table();

    train(&mut network, &samples, &config, (config.epochs / 10).max(1), &mut rng)?;

    for sample in &samples {
        let output = network.predict(&sample.input)?;
        info!(input = ?sample.input, target = ?sample.output, output = ?output, "prediction");
    }
    Ok(())
}

fn run_digits(args: &DigitsArgs) -> anyhow::Result<()> {
    let config = resolve_config(&args.run, RunConfig::digits())?;

    let training = load_idx_pair(&args.train_images, &args.train_labels, 10, Some(args.train_size))
        .context("cannot load training set")?;
    let test = load_idx_pair(&args.test_images, &args.test_labels, 10, Some(args.test_size))
        .context("cannot load test set")?;
    info!(training = training.len(), test = test.len(), "loaded digit images");

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut network = build(&config, &mut rng)?;

    train(&mut network, &training, &config, 1, &mut rng)?;

    let result = evaluate(&mut network, &test)?;
    info!(
        correct = result.correct,
        total = result.total,
        accuracy = %format!("{:.2}%", result.accuracy() * 100.0),
        "test accuracy"
    );
    Ok(())
}
