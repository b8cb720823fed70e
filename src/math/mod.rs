pub mod init;

pub use init::{Initializer, WeightGenerator};
