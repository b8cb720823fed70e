pub mod classifier;

pub use classifier::{DigitClassifier, OutputDecoding};
