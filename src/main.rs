//! Command-line driver: loads IDX digit files, builds a classifier and runs
//! the test-then-train rounds.
//!
//! Run with:
//!   cargo run --release -- --images train-images.idx3-ubyte --labels train-labels.idx1-ubyte

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use neuron_digits::data::idx::load_idx_pair;
use neuron_digits::train::{train_rounds, StepSchedule, TrainConfig};
use neuron_digits::{
    DigitClassifier, DigitDataSet, Initializer, LayerConfig, NetworkSpec, NeuronKind, OutputDecoding,
};

/// Train a scalar-neuron network to classify handwritten digits.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// IDX3 training images
    #[arg(long)]
    images: String,

    /// IDX1 training labels
    #[arg(long)]
    labels: String,

    /// IDX3 testing images; without them a tenth of the training data is held out
    #[arg(long, requires = "test_labels")]
    test_images: Option<String>,

    /// IDX1 testing labels
    #[arg(long, requires = "test_images")]
    test_labels: Option<String>,

    /// JSON TrainConfig; command-line values override it
    #[arg(long)]
    config: Option<String>,

    /// JSON NetworkSpec describing the hidden layers (its last layer must not be the output)
    #[arg(long, conflicts_with = "hidden")]
    architecture: Option<String>,

    /// Hidden ReLU layer sizes, comma separated
    #[arg(long, value_delimiter = ',', default_value = "16")]
    hidden: Vec<usize>,

    #[arg(long)]
    rounds: Option<usize>,

    /// Passes over the training set per round
    #[arg(long)]
    iterations: Option<usize>,

    /// Constant step size (replaces the accuracy-based schedule)
    #[arg(long)]
    step_size: Option<f64>,

    #[arg(long)]
    train_limit: Option<usize>,

    #[arg(long)]
    test_limit: Option<usize>,

    /// Seed for weights and sample selection
    #[arg(long)]
    seed: Option<u64>,

    /// Print one random test case with its image every round
    #[arg(long)]
    print: bool,

    /// Ten one-hot outputs decoded by argmax instead of one rounded output
    #[arg(long)]
    one_hot: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => TrainConfig::load_json(path).with_context(|| format!("loading config {}", path))?,
        None => TrainConfig::default(),
    };
    apply_overrides(&mut config, &args);

    let data = load_data(&args, config.seed)?;
    let input_count = match data.training.first() {
        Some(sample) => sample.pixels.len(),
        None => bail!("training set is empty"),
    };

    let hidden = hidden_layers(&args, input_count, config.seed)?;
    let decoding = if args.one_hot { OutputDecoding::Argmax } else { OutputDecoding::Round };
    let output_init = Initializer::Centered;
    let output_generator = match config.seed {
        Some(seed) => output_init.generator_seeded(seed.wrapping_add(u64::MAX / 2)),
        None => output_init.generator(),
    };
    let mut classifier = DigitClassifier::new(input_count, hidden, decoding, output_generator)
        .context("building classifier")?;

    let history = train_rounds(&mut classifier, &data, &config)?;
    if let Some(last) = history.last() {
        info!("last round: {:?}", last);
    }
    Ok(())
}

fn apply_overrides(config: &mut TrainConfig, args: &Args) {
    if let Some(rounds) = args.rounds {
        config.rounds = rounds;
    }
    if let Some(iterations) = args.iterations {
        config.iterations = iterations;
    }
    if let Some(step) = args.step_size {
        config.schedule = StepSchedule::constant(step);
    }
    if let Some(limit) = args.train_limit {
        config.train_limit = limit;
    }
    if let Some(limit) = args.test_limit {
        config.test_limit = limit;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config.print_sample |= args.print;
}

fn load_data(args: &Args, seed: Option<u64>) -> Result<DigitDataSet> {
    let training = load_idx_pair(&args.images, &args.labels)
        .with_context(|| format!("reading {} / {}", args.images, args.labels))?;

    let data = match (&args.test_images, &args.test_labels) {
        (Some(images), Some(labels)) => {
            let testing = load_idx_pair(images, labels)
                .with_context(|| format!("reading {} / {}", images, labels))?;
            DigitDataSet::new(training, testing)
        }
        _ => DigitDataSet::split(training, 0.1),
    };

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    Ok(DigitDataSet::combine(vec![data], true, &mut rng))
}

fn hidden_layers(args: &Args, input_count: usize, seed: Option<u64>) -> Result<Vec<LayerConfig>> {
    if let Some(path) = &args.architecture {
        let spec = NetworkSpec::load_json(path).with_context(|| format!("loading architecture {}", path))?;
        if spec.input_size != input_count {
            bail!(
                "architecture {} expects {} inputs but the images have {} pixels",
                spec.name, spec.input_size, input_count
            );
        }
        return Ok(spec.to_configs(seed));
    }

    let init = Initializer::Centered;
    Ok(args
        .hidden
        .iter()
        .filter(|&&size| size > 0)
        .enumerate()
        .map(|(i, &size)| {
            let generator = match seed {
                Some(seed) => init.generator_seeded(seed.wrapping_add(i as u64)),
                None => init.generator(),
            };
            LayerConfig {
                size,
                input_size: None,
                neuron: NeuronKind::ReLU,
                generator,
            }
        })
        .collect())
}
