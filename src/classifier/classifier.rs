use log::debug;
use serde::{Serialize, Deserialize};

use crate::activation::activation::NeuronKind;
use crate::data::ascii::{render_ascii, square_side};
use crate::data::dataset::DigitSample;
use crate::error::{NetworkError, Result};
use crate::loss::mse::MseLoss;
use crate::math::init::WeightGenerator;
use crate::network::network::Network;
use crate::network::spec::LayerConfig;

/// How the output layer encodes a digit.
///
/// - `Round`  — one output neuron regressed on the digit value; the guess is
///              the output rounded to the nearest digit.
/// - `Argmax` — ten output neurons trained on one-hot targets; the guess is
///              the index of the largest output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutputDecoding {
    #[default]
    Round,
    Argmax,
}

impl OutputDecoding {
    pub fn output_size(self) -> usize {
        match self {
            OutputDecoding::Round => 1,
            OutputDecoding::Argmax => 10,
        }
    }

    /// Training target for `digit`.
    pub fn target(self, digit: u8) -> Vec<f64> {
        match self {
            OutputDecoding::Round => vec![digit as f64],
            OutputDecoding::Argmax => {
                let mut one_hot = vec![0.0; 10];
                one_hot[digit.min(9) as usize] = 1.0;
                one_hot
            }
        }
    }

    /// Turns raw network outputs into a digit guess.
    pub fn decode(self, outputs: &[f64]) -> u8 {
        match self {
            OutputDecoding::Round => {
                let value = outputs.first().copied().unwrap_or(0.0);
                if value.is_nan() { 0 } else { value.round().clamp(0.0, 9.0) as u8 }
            }
            OutputDecoding::Argmax => argmax(outputs) as u8,
        }
    }
}

/// Index of the maximum element in a slice.
fn argmax(v: &[f64]) -> usize {
    v.iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Trains and evaluates a `Network` on labelled pixel matrices.
#[derive(Debug)]
pub struct DigitClassifier {
    network: Network,
    decoding: OutputDecoding,
}

impl DigitClassifier {
    /// Stacks `hidden` and a linear output layer sized for `decoding`.
    pub fn new(
        input_count: usize,
        mut hidden: Vec<LayerConfig>,
        decoding: OutputDecoding,
        output_generator: WeightGenerator,
    ) -> Result<DigitClassifier> {
        hidden.push(LayerConfig {
            size: decoding.output_size(),
            input_size: None,
            neuron: NeuronKind::Linear,
            generator: output_generator,
        });
        let network = Network::new(input_count, hidden)?;
        Ok(DigitClassifier { network, decoding })
    }

    /// Wraps a network whose output size already matches `decoding`.
    pub fn from_network(network: Network, decoding: OutputDecoding) -> Result<DigitClassifier> {
        if network.output_size() != decoding.output_size() {
            return Err(NetworkError::InvalidConfig(format!(
                "{:?} decoding needs {} outputs, network has {}",
                decoding,
                decoding.output_size(),
                network.output_size()
            )));
        }
        Ok(DigitClassifier { network, decoding })
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn decoding(&self) -> OutputDecoding {
        self.decoding
    }

    pub fn predict(&mut self, pixels: &[f64]) -> Result<u8> {
        let outputs = self.network.run_with(pixels)?;
        Ok(self.decoding.decode(&outputs))
    }

    /// Fraction of `samples` guessed correctly; `0.0` for an empty set.
    ///
    /// With `print`, every sample is written to stdout together with its
    /// ASCII image.
    pub fn test(&mut self, samples: &[DigitSample], print: bool) -> Result<f64> {
        if samples.is_empty() {
            return Ok(0.0);
        }
        let mut correct = 0usize;
        for sample in samples {
            let outputs = self.network.run_with(&sample.pixels)?;
            let guess = self.decoding.decode(&outputs);
            let hit = guess == sample.digit;
            if hit {
                correct += 1;
            }
            if print {
                print_case(sample, &outputs, guess, hit);
            }
        }
        Ok(correct as f64 / samples.len() as f64)
    }

    /// Runs `iterations` full passes over `samples`, one descent step of size
    /// `step_size` per sample. Returns the mean loss of the last pass.
    pub fn train(&mut self, samples: &[DigitSample], step_size: f64, iterations: usize) -> Result<f64> {
        let mut last_loss = 0.0;
        for iteration in 0..iterations {
            let mut total = 0.0;
            for sample in samples {
                let target = self.decoding.target(sample.digit);
                self.network.train_with(&sample.pixels, &target, -step_size)?;
                // outputs still hold this step's forward values
                total += MseLoss::loss(&self.network.outputs(), &target);
            }
            last_loss = if samples.is_empty() { 0.0 } else { total / samples.len() as f64 };
            debug!("iteration {}: loss = {:.6}", iteration + 1, last_loss);
        }
        Ok(last_loss)
    }
}

fn print_case(sample: &DigitSample, outputs: &[f64], guess: u8, hit: bool) {
    let shown = outputs
        .iter()
        .map(|o| format!("{:.4}", o))
        .collect::<Vec<_>>()
        .join(", ");
    println!("[TEST]   Expected -> {}   Actual -> {} ({})", sample.digit, shown, guess);
    println!("{}CORRECT GUESS", if hit { "" } else { "IN" });
    if let Some(side) = square_side(sample.pixels.len()) {
        println!("Image of the digit:");
        println!("{}", render_ascii(&sample.pixels, side));
    }
    println!();
}
