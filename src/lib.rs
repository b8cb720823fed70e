pub mod error;
pub mod cell;
pub mod math;
pub mod activation;
pub mod neuron;
pub mod layers;
pub mod network;
pub mod loss;
pub mod classifier;
pub mod data;
pub mod train;

// Convenience re-exports
pub use error::{NetworkError, Result};
pub use cell::cell::{Cell, CellArena, CellId};
pub use math::init::{Initializer, WeightGenerator};
pub use activation::activation::NeuronKind;
pub use neuron::neuron::Neuron;
pub use layers::layer::Layer;
pub use network::network::Network;
pub use network::spec::{LayerConfig, LayerSpec, NetworkSpec};
pub use loss::mse::MseLoss;
pub use classifier::classifier::{DigitClassifier, OutputDecoding};
pub use data::dataset::{DigitDataSet, DigitSample};
pub use train::{train_rounds, TrainConfig};
