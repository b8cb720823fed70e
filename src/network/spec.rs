use serde::{Serialize, Deserialize};

use crate::activation::activation::NeuronKind;
use crate::error::Result;
use crate::math::init::{Initializer, WeightGenerator};

/// Runtime description of one layer, handed to `Network::new`.
///
/// - `size`       — number of neurons
/// - `input_size` — declared fan-in; when set it must equal the previous
///                  layer's size (or the network input size for the first
///                  layer), otherwise construction fails
/// - `neuron`     — `Linear` or `ReLU`
/// - `generator`  — produces the initial value of every weight in the layer
pub struct LayerConfig {
    pub size: usize,
    pub input_size: Option<usize>,
    pub neuron: NeuronKind,
    pub generator: WeightGenerator,
}

impl LayerConfig {
    pub fn new(size: usize, neuron: NeuronKind, generator: impl FnMut() -> f64 + 'static) -> Self {
        LayerConfig {
            size,
            input_size: None,
            neuron,
            generator: Box::new(generator),
        }
    }

    /// Declares the fan-in this layer expects.
    pub fn with_input_size(mut self, input_size: usize) -> Self {
        self.input_size = Some(input_size);
        self
    }
}

impl std::fmt::Debug for LayerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayerConfig")
            .field("size", &self.size)
            .field("input_size", &self.input_size)
            .field("neuron", &self.neuron)
            .finish_non_exhaustive()
    }
}

/// Serializable counterpart of `LayerConfig`: the generator is replaced by
/// an `Initializer` policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub size: usize,
    #[serde(default)]
    pub input_size: Option<usize>,
    pub neuron: NeuronKind,
    #[serde(default)]
    pub init: Initializer,
}

impl LayerSpec {
    pub fn new(size: usize, neuron: NeuronKind, init: Initializer) -> Self {
        LayerSpec { size, input_size: None, neuron, init }
    }

    /// Builds the runtime config. With a seed the weights are reproducible.
    pub fn to_config(&self, seed: Option<u64>) -> LayerConfig {
        let generator = match seed {
            Some(seed) => self.init.generator_seeded(seed),
            None => self.init.generator(),
        };
        LayerConfig {
            size: self.size,
            input_size: self.input_size,
            neuron: self.neuron,
            generator,
        }
    }
}

/// A network architecture (never its weights) that can be kept as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Human-readable name.
    pub name: String,
    /// Length of the raw input vector.
    pub input_size: usize,
    /// Ordered layer descriptions (input → output).
    pub layers: Vec<LayerSpec>,
}

impl NetworkSpec {
    /// Runtime configs for every layer. Layer `i` is seeded with `seed + i`.
    pub fn to_configs(&self, seed: Option<u64>) -> Vec<LayerConfig> {
        self.layers
            .iter()
            .enumerate()
            .map(|(i, layer)| layer.to_config(seed.map(|s| s.wrapping_add(i as u64))))
            .collect()
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a `NetworkSpec` from a JSON file.
    pub fn load_json(path: &str) -> Result<NetworkSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
