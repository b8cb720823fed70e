use std::sync::atomic::Ordering;
use std::time::Instant;

use log::{info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::classifier::classifier::DigitClassifier;
use crate::data::dataset::DigitDataSet;
use crate::error::Result;
use crate::train::round_stats::RoundStats;
use crate::train::train_config::TrainConfig;

/// Runs `config.rounds` rounds of: optionally print one random test case,
/// measure test accuracy, pick the step size from it, then train for
/// `config.iterations` passes. Returns the stats of every completed round.
///
/// # Early termination
/// The loop breaks early if:
/// - the `progress_tx` receiver has been dropped, **or**
/// - `config.stop_flag` is set to `true`.
pub fn train_rounds(
    classifier: &mut DigitClassifier,
    data: &DigitDataSet,
    config: &TrainConfig,
) -> Result<Vec<RoundStats>> {
    let training = &data.training[..data.training.len().min(config.train_limit)];
    let testing = &data.testing[..data.testing.len().min(config.test_limit)];
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    info!(
        "training on {} samples, testing on {} samples, {} rounds of {} iterations",
        training.len(),
        testing.len(),
        config.rounds,
        config.iterations
    );

    let started = Instant::now();
    let mut history = Vec::with_capacity(config.rounds);

    for round in 1..=config.rounds {
        if stop_requested(config) {
            break;
        }

        let t_start = Instant::now();

        if config.print_sample {
            if let Some(sample) = testing.choose(&mut rng) {
                classifier.test(std::slice::from_ref(sample), true)?;
            }
        }

        let accuracy = classifier.test(testing, false)?;
        let step_size = config.schedule.step_for(accuracy);
        let iterations_done = (round - 1) * config.iterations;
        info!(
            "accuracy after {} iterations: {:.3} (step size {:e})",
            iterations_done, accuracy, step_size
        );

        let train_loss = classifier.train(training, step_size, config.iterations)?;
        if !train_loss.is_finite() {
            warn!("round {}: training loss is {}, step size {:e} is too large", round, train_loss, step_size);
        }

        let stats = RoundStats {
            round,
            iterations_done,
            accuracy,
            step_size,
            train_loss,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };
        history.push(stats.clone());

        if let Some(ref tx) = config.progress_tx {
            if tx.send(stats).is_err() {
                break;
            }
        }
    }

    let final_accuracy = classifier.test(testing, false)?;
    info!(
        "final accuracy {:.3} after {} rounds in {:.2?}",
        final_accuracy,
        history.len(),
        started.elapsed()
    );

    Ok(history)
}

fn stop_requested(config: &TrainConfig) -> bool {
    config
        .stop_flag
        .as_ref()
        .map_or(false, |flag| flag.load(Ordering::Relaxed))
}
