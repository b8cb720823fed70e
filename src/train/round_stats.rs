use serde::{Serialize, Deserialize};

/// Statistics for one training round, emitted by `train_rounds`.
///
/// When `TrainConfig::progress_tx` is set, one value is sent at the end of
/// every completed round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundStats {
    /// 1-based round number.
    pub round: usize,
    /// Full passes over the training set completed before this round.
    pub iterations_done: usize,
    /// Test accuracy measured at the start of the round, in `[0, 1]`.
    pub accuracy: f64,
    /// Step size chosen from `accuracy`.
    pub step_size: f64,
    /// Mean loss over the last training pass of the round.
    pub train_loss: f64,
    /// Wall-clock duration of the round in milliseconds.
    pub elapsed_ms: u64,
}
