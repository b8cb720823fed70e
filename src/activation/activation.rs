use serde::{Serialize, Deserialize};

/// The behaviour a neuron applies to its weighted sum.
///
/// `Linear` passes the sum through unchanged. `ReLU` clamps negatives to zero
/// and blocks the backward pass whenever its forward output was clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum NeuronKind {
    #[default]
    Linear,
    ReLU,
}

impl NeuronKind {
    pub fn function(&self, x: f64) -> f64 {
        match self {
            NeuronKind::Linear => x,
            NeuronKind::ReLU => if x > 0.0 { x } else { 0.0 },
        }
    }

    /// Whether gradients may flow back through a neuron whose forward output
    /// was `output`.
    pub fn passes_gradient(&self, output: f64) -> bool {
        match self {
            NeuronKind::Linear => true,
            NeuronKind::ReLU => output > 0.0,
        }
    }
}
