pub mod activation;

pub use activation::NeuronKind;
