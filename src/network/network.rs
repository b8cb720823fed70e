use std::rc::Rc;

use log::{debug, trace};

use crate::cell::cell::{CellArena, CellId};
use crate::error::{NetworkError, Result};
use crate::layers::layer::Layer;
use crate::loss::mse::MseLoss;
use crate::network::spec::{LayerConfig, NetworkSpec};

/// A stack of fully connected layers over one cell arena.
///
/// The network owns every cell: the external input cells, and through its
/// layers every weight and output cell.
#[derive(Debug, Clone)]
pub struct Network {
    cells: CellArena,
    inputs: Rc<[CellId]>,
    layers: Vec<Layer>,
}

impl Network {
    /// Builds the layers in order, wiring each one to the previous layer's
    /// outputs (the first one to `input_size` fresh input cells).
    ///
    /// Fails if there are no layers, a layer has no neurons, or a layer's
    /// declared `input_size` disagrees with what actually feeds it.
    pub fn new(input_size: usize, configs: Vec<LayerConfig>) -> Result<Network> {
        if configs.is_empty() {
            return Err(NetworkError::EmptyNetwork);
        }

        let mut cells = CellArena::new();
        let inputs: Rc<[CellId]> = cells.alloc_many(input_size).into();
        let mut layers: Vec<Layer> = Vec::with_capacity(configs.len());
        let mut feed = Rc::clone(&inputs);

        for (index, mut config) in configs.into_iter().enumerate() {
            if config.size == 0 {
                return Err(NetworkError::EmptyLayer { layer: index });
            }
            if let Some(declared) = config.input_size {
                if declared != feed.len() {
                    return Err(NetworkError::ShapeMismatch {
                        layer: index,
                        expected: feed.len(),
                        declared,
                    });
                }
            }

            let layer = Layer::new(&mut cells, feed, config.size, config.neuron, &mut config.generator);
            feed = layer.outputs().into();
            layers.push(layer);
        }

        debug!(
            "built network: {} inputs, layers {:?}, {} cells",
            input_size,
            layers.iter().map(Layer::len).collect::<Vec<_>>(),
            cells.len()
        );

        Ok(Network { cells, inputs, layers })
    }

    /// Builds a network from a stored architecture.
    pub fn from_spec(spec: &NetworkSpec, seed: Option<u64>) -> Result<Network> {
        Network::new(spec.input_size, spec.to_configs(seed))
    }

    pub fn input_size(&self) -> usize {
        self.inputs.len()
    }

    pub fn output_size(&self) -> usize {
        self.last_layer().len()
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn cells(&self) -> &CellArena {
        &self.cells
    }

    /// Direct access to every cell, e.g. to set weights by hand.
    pub fn cells_mut(&mut self) -> &mut CellArena {
        &mut self.cells
    }

    fn last_layer(&self) -> &Layer {
        // `new` rejects empty layer lists
        &self.layers[self.layers.len() - 1]
    }

    /// Values currently held by the final layer's output cells.
    pub fn outputs(&self) -> Vec<f64> {
        self.cells.values(self.last_layer().outputs())
    }

    /// Forward pass: loads `input` into the input cells, evaluates every layer
    /// in order and returns the final outputs.
    pub fn run_with(&mut self, input: &[f64]) -> Result<Vec<f64>> {
        if input.len() != self.inputs.len() {
            return Err(NetworkError::InputLength {
                expected: self.inputs.len(),
                actual: input.len(),
            });
        }
        for (&cell, &value) in self.inputs.iter().zip(input) {
            self.cells.set_value(cell, value);
        }
        for layer in &self.layers {
            layer.forward(&mut self.cells);
        }
        Ok(self.outputs())
    }

    /// One supervised step: forward, seed every output gradient with
    /// `prediction - target`, then run the layers backward last to first,
    /// moving each weight by `step_size * gradient`.
    ///
    /// Pass a negative `step_size` for gradient descent.
    pub fn train_with(&mut self, input: &[f64], target: &[f64], step_size: f64) -> Result<()> {
        if target.len() != self.output_size() {
            return Err(NetworkError::TargetLength {
                expected: self.output_size(),
                actual: target.len(),
            });
        }
        let prediction = self.run_with(input)?;
        let seeds = MseLoss::derivative(&prediction, target);
        trace!("train step: loss = {}", MseLoss::loss(&prediction, target));

        let last = self.layers.len() - 1;
        for (&cell, &seed) in self.layers[last].outputs().iter().zip(&seeds) {
            self.cells.set_gradient(cell, seed);
        }

        for layer in self.layers.iter().rev() {
            layer.reset_input_gradients(&mut self.cells);
            layer.backward(&mut self.cells, Some(step_size));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::activation::NeuronKind;
    use crate::math::init::Initializer;
    use crate::network::spec::LayerSpec;

    fn constant(size: usize, neuron: NeuronKind, value: f64) -> LayerConfig {
        LayerConfig::new(size, neuron, move || value)
    }

    #[test]
    fn wires_layers_in_sequence() {
        let network = Network::new(
            3,
            vec![constant(4, NeuronKind::ReLU, 0.1), constant(2, NeuronKind::Linear, 0.1)],
        )
        .unwrap();
        assert_eq!(network.input_size(), 3);
        assert_eq!(network.output_size(), 2);
        assert_eq!(network.layers()[1].inputs(), network.layers()[0].outputs());
        // 3 inputs + 4 * (4 + 1) + 2 * (5 + 1)
        assert_eq!(network.cells().len(), 3 + 20 + 12);
    }

    #[test]
    fn run_with_evaluates_every_layer() {
        let mut network = Network::new(
            2,
            vec![constant(2, NeuronKind::Linear, 1.0), constant(1, NeuronKind::Linear, 0.5)],
        )
        .unwrap();
        // hidden = 1 + 2 + 1 = 4 each; output = 0.5 * 4 + 0.5 * 4 + 0.5
        assert_eq!(network.run_with(&[1.0, 2.0]).unwrap(), vec![4.5]);
    }

    #[test]
    fn run_with_leaves_gradients_alone() {
        let mut network = Network::new(1, vec![constant(1, NeuronKind::Linear, 1.0)]).unwrap();
        network.run_with(&[2.0]).unwrap();
        assert!(network.cells().iter().all(|cell| cell.gradient == 0.0));
    }

    #[test]
    fn declared_input_mismatch_fails() {
        let err = Network::new(
            3,
            vec![
                constant(4, NeuronKind::ReLU, 0.1).with_input_size(3),
                constant(2, NeuronKind::Linear, 0.1).with_input_size(5),
            ],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            NetworkError::ShapeMismatch { layer: 1, expected: 4, declared: 5 }
        ));
    }

    #[test]
    fn first_layer_must_match_input_size() {
        let err = Network::new(2, vec![constant(1, NeuronKind::Linear, 0.0).with_input_size(3)]).unwrap_err();
        assert!(matches!(err, NetworkError::ShapeMismatch { layer: 0, .. }));
    }

    #[test]
    fn empty_configurations_fail() {
        assert!(matches!(Network::new(2, vec![]), Err(NetworkError::EmptyNetwork)));
        assert!(matches!(
            Network::new(2, vec![constant(0, NeuronKind::Linear, 0.0)]),
            Err(NetworkError::EmptyLayer { layer: 0 })
        ));
    }

    #[test]
    fn wrong_vector_lengths_are_rejected() {
        let mut network = Network::new(2, vec![constant(1, NeuronKind::Linear, 0.0)]).unwrap();
        assert!(matches!(
            network.run_with(&[1.0]),
            Err(NetworkError::InputLength { expected: 2, actual: 1 })
        ));
        assert!(matches!(
            network.train_with(&[1.0, 2.0], &[1.0, 2.0], -0.1),
            Err(NetworkError::TargetLength { expected: 1, actual: 2 })
        ));
    }

    #[test]
    fn train_with_takes_a_descent_step() {
        let mut network = Network::new(1, vec![constant(1, NeuronKind::Linear, 0.0)]).unwrap();
        network.train_with(&[2.0], &[1.0], -0.5).unwrap();
        // seed = 0 - 1 = -1; gradients (x * seed, seed) = (-2, -1)
        let weights = network.layers()[0].neurons()[0].weights().to_vec();
        assert_eq!(network.cells().values(&weights), vec![1.0, 0.5]);
    }

    #[test]
    fn train_with_reaches_earlier_layers() {
        let mut network = Network::new(
            1,
            vec![constant(1, NeuronKind::Linear, 1.0), constant(1, NeuronKind::Linear, 1.0)],
        )
        .unwrap();
        let before = network.cells().values(network.layers()[0].neurons()[0].weights());
        network.train_with(&[1.0], &[0.0], -0.1).unwrap();
        let after = network.cells().values(network.layers()[0].neurons()[0].weights());
        assert_ne!(before, after);
    }

    #[test]
    fn repeated_steps_do_not_leak_gradients() {
        let mut network = Network::new(
            1,
            vec![constant(2, NeuronKind::Linear, 0.5), constant(1, NeuronKind::Linear, 0.5)],
        )
        .unwrap();
        network.train_with(&[1.0], &[1.0], 0.0).unwrap();
        let first: Vec<f64> = network.layers()[1].inputs().iter().map(|&c| network.cells().gradient(c)).collect();
        network.train_with(&[1.0], &[1.0], 0.0).unwrap();
        let second: Vec<f64> = network.layers()[1].inputs().iter().map(|&c| network.cells().gradient(c)).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn from_spec_is_reproducible() {
        let spec = NetworkSpec {
            name: "tiny".to_string(),
            input_size: 2,
            layers: vec![
                LayerSpec::new(3, NeuronKind::ReLU, Initializer::Centered),
                LayerSpec::new(1, NeuronKind::Linear, Initializer::Centered),
            ],
        };
        let mut a = Network::from_spec(&spec, Some(11)).unwrap();
        let mut b = Network::from_spec(&spec, Some(11)).unwrap();
        assert_eq!(a.run_with(&[0.3, 0.9]).unwrap(), b.run_with(&[0.3, 0.9]).unwrap());
    }
}
