pub mod ascii;
pub mod dataset;
pub mod idx;

pub use ascii::{render_ascii, square_side};
pub use dataset::{DigitDataSet, DigitSample};
pub use idx::{load_idx_pair, parse_idx_pair};
