use serde::{Serialize, Deserialize};

/// Multiplies the step size by `factor` once test accuracy reaches `accuracy`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepDecay {
    pub accuracy: f64,
    pub factor: f64,
}

/// Open-loop step size schedule: the better the measured accuracy, the
/// smaller the step. Never drops below `floor`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepSchedule {
    pub initial: f64,
    #[serde(default)]
    pub floor: f64,
    #[serde(default)]
    pub decay: Vec<StepDecay>,
}

impl StepSchedule {
    /// A schedule that always returns `step`.
    pub fn constant(step: f64) -> Self {
        StepSchedule { initial: step, floor: 0.0, decay: Vec::new() }
    }

    pub fn step_for(&self, accuracy: f64) -> f64 {
        let step = self
            .decay
            .iter()
            .filter(|d| accuracy >= d.accuracy)
            .fold(self.initial, |step, d| step * d.factor);
        step.max(self.floor)
    }
}

impl Default for StepSchedule {
    fn default() -> Self {
        StepSchedule {
            initial: 1e-4,
            floor: 1e-6,
            decay: vec![
                StepDecay { accuracy: 0.5, factor: 0.5 },
                StepDecay { accuracy: 0.8, factor: 0.5 },
            ],
        }
    }
}
