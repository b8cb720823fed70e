pub mod loop_fn;
pub mod round_stats;
pub mod schedule;
pub mod train_config;

pub use loop_fn::train_rounds;
pub use round_stats::RoundStats;
pub use schedule::{StepDecay, StepSchedule};
pub use train_config::TrainConfig;
