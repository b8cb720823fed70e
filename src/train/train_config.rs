use std::sync::mpsc;
use std::sync::{Arc, atomic::AtomicBool};

use serde::{Serialize, Deserialize};

use crate::error::Result;
use crate::train::round_stats::RoundStats;
use crate::train::schedule::StepSchedule;

/// Configuration for a `train_rounds` run.
///
/// # Fields
/// - `rounds`       — number of test-then-train rounds
/// - `iterations`   — full passes over the training set per round
/// - `schedule`     — step size as a function of measured accuracy
/// - `train_limit`  — at most this many training samples are used
/// - `test_limit`   — at most this many testing samples are used
/// - `print_sample` — print one random test case (with its image) per round
/// - `seed`         — seeds sample selection; `None` uses OS entropy
/// - `progress_tx`  — optional channel; one `RoundStats` per completed round.
///                    If the receiver is dropped the run stops early.
/// - `stop_flag`    — optional atomic flag; when set the run stops after the
///                    current round.
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub rounds: usize,
    pub iterations: usize,
    pub schedule: StepSchedule,
    pub train_limit: usize,
    pub test_limit: usize,
    pub print_sample: bool,
    pub seed: Option<u64>,
    #[serde(skip)]
    pub progress_tx: Option<mpsc::Sender<RoundStats>>,
    #[serde(skip)]
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl TrainConfig {
    /// Creates a config with a constant step size and no channel or flag.
    pub fn new(rounds: usize, iterations: usize, step_size: f64) -> Self {
        TrainConfig {
            rounds,
            iterations,
            schedule: StepSchedule::constant(step_size),
            ..TrainConfig::default()
        }
    }

    /// Deserializes a `TrainConfig` from a JSON file. Missing fields take
    /// their defaults.
    pub fn load_json(path: &str) -> Result<TrainConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            rounds: 50,
            iterations: 50,
            schedule: StepSchedule::default(),
            train_limit: 10_000,
            test_limit: 100,
            print_sample: false,
            seed: None,
            progress_tx: None,
            stop_flag: None,
        }
    }
}
