//! Error type shared by the engine, the classifier and the data loaders.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, NetworkError>;

#[derive(Error, Debug)]
pub enum NetworkError {
    /// A network must contain at least one layer.
    #[error("network has no layers")]
    EmptyNetwork,

    /// Every layer needs a positive neuron count.
    #[error("layer {layer} has no neurons")]
    EmptyLayer { layer: usize },

    /// A layer declared an input size that does not match what feeds it.
    #[error("layer {layer} declares {declared} inputs but is fed {expected} cells")]
    ShapeMismatch {
        layer: usize,
        expected: usize,
        declared: usize,
    },

    /// A neuron must own exactly one weight per input plus a trailing bias.
    #[error("neuron has {weights} weights for {inputs} inputs (expected inputs + 1)")]
    BiasConvention { weights: usize, inputs: usize },

    #[error("expected an input vector of length {expected}, got {actual}")]
    InputLength { expected: usize, actual: usize },

    #[error("expected a target vector of length {expected}, got {actual}")]
    TargetLength { expected: usize, actual: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("malformed IDX data: {0}")]
    Idx(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
