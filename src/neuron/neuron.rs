use std::rc::Rc;

use crate::activation::activation::NeuronKind;
use crate::cell::cell::{CellArena, CellId};
use crate::error::{NetworkError, Result};

/// A scalar neuron: `output = kind(w_0*x_0 + ... + w_{n-1}*x_{n-1} + w_n)`.
///
/// The neuron owns its weight cells and its output cell; the input cells are
/// shared with every sibling in the same layer and are only referenced.
///
/// Bias convention: there is always exactly one more weight than there are
/// inputs. The trailing weight has no input and is multiplied by `1.0`.
#[derive(Debug, Clone)]
pub struct Neuron {
    inputs: Rc<[CellId]>,
    output: CellId,
    weights: Vec<CellId>,
    kind: NeuronKind,
}

impl Neuron {
    /// Allocates `inputs.len() + 1` weight cells (values drawn from `generator`)
    /// and one output cell in `arena`.
    pub fn new<G: FnMut() -> f64>(
        arena: &mut CellArena,
        inputs: Rc<[CellId]>,
        kind: NeuronKind,
        generator: &mut G,
    ) -> Neuron {
        let weights = (0..=inputs.len()).map(|_| arena.alloc(generator())).collect();
        let output = arena.alloc(0.0);
        Neuron { inputs, output, weights, kind }
    }

    /// Wires a neuron from cells that already exist.
    pub fn from_parts(
        inputs: Rc<[CellId]>,
        output: CellId,
        weights: Vec<CellId>,
        kind: NeuronKind,
    ) -> Result<Neuron> {
        if weights.len() != inputs.len() + 1 {
            return Err(NetworkError::BiasConvention {
                weights: weights.len(),
                inputs: inputs.len(),
            });
        }
        Ok(Neuron { inputs, output, weights, kind })
    }

    pub fn inputs(&self) -> &[CellId] {
        &self.inputs
    }

    pub fn output(&self) -> CellId {
        self.output
    }

    pub fn weights(&self) -> &[CellId] {
        &self.weights
    }

    pub fn bias(&self) -> CellId {
        self.weights[self.inputs.len()]
    }

    pub fn kind(&self) -> NeuronKind {
        self.kind
    }

    fn coefficient(&self, arena: &CellArena, i: usize) -> f64 {
        self.inputs.get(i).map_or(1.0, |&input| arena.value(input))
    }

    /// Computes the output value and clears every weight gradient ready for
    /// the next backward pass.
    pub fn forward(&self, arena: &mut CellArena) {
        let mut sum = 0.0;
        for (i, &weight) in self.weights.iter().enumerate() {
            arena.set_gradient(weight, 0.0);
            sum += self.coefficient(arena, i) * arena.value(weight);
        }
        arena.set_value(self.output, self.kind.function(sum));
    }

    /// Propagates the output gradient to the weights and the inputs, then
    /// optionally moves every weight by `step_size * gradient`.
    ///
    /// The output gradient must already be seeded. Input gradients are added
    /// to, never overwritten, since siblings share the same input cells. Pass a
    /// negative step size for gradient descent.
    pub fn backward(&self, arena: &mut CellArena, step_size: Option<f64>) {
        let output = *arena.get(self.output);
        let active = self.kind.passes_gradient(output.value);
        let upstream = if active { output.gradient } else { 0.0 };

        for (i, &weight) in self.weights.iter().enumerate() {
            let coefficient = self.coefficient(arena, i);
            arena.add_gradient(weight, coefficient * upstream);

            if let Some(&input) = self.inputs.get(i) {
                arena.add_gradient(input, arena.value(weight) * upstream);
            }

            if let Some(step) = step_size {
                let cell = arena.get_mut(weight);
                cell.value += step * cell.gradient;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a neuron over fresh input cells holding `xs`, with weights `ws`.
    fn wired(xs: &[f64], ws: &[f64], kind: NeuronKind) -> (CellArena, Neuron) {
        let mut arena = CellArena::new();
        let inputs: Rc<[CellId]> = xs.iter().map(|&x| arena.alloc(x)).collect();
        let weights = ws.iter().map(|&w| arena.alloc(w)).collect();
        let output = arena.alloc(0.0);
        let neuron = Neuron::from_parts(inputs, output, weights, kind).unwrap();
        (arena, neuron)
    }

    #[test]
    fn pure_bias_outputs_bias() {
        let (mut arena, neuron) = wired(&[], &[0.7], NeuronKind::Linear);
        neuron.forward(&mut arena);
        assert_eq!(arena.value(neuron.output()), 0.7);
    }

    #[test]
    fn linear_forward_is_weighted_sum_plus_bias() {
        let (mut arena, neuron) = wired(&[2.0, -3.0], &[0.5, 0.25, 1.0], NeuronKind::Linear);
        neuron.forward(&mut arena);
        assert_eq!(arena.value(neuron.output()), 2.0 * 0.5 + -3.0 * 0.25 + 1.0);
    }

    #[test]
    fn relu_forward_clamps_and_passes() {
        let (mut arena, neuron) = wired(&[1.0], &[-2.0, 0.5], NeuronKind::ReLU);
        neuron.forward(&mut arena);
        assert_eq!(arena.value(neuron.output()), 0.0);

        let (mut arena, neuron) = wired(&[1.0], &[2.0, 0.5], NeuronKind::ReLU);
        neuron.forward(&mut arena);
        assert_eq!(arena.value(neuron.output()), 2.5);
    }

    #[test]
    fn forward_clears_weight_gradients() {
        let (mut arena, neuron) = wired(&[1.0], &[1.0, 1.0], NeuronKind::Linear);
        for &w in neuron.weights() {
            arena.set_gradient(w, 9.0);
        }
        neuron.forward(&mut arena);
        for &w in neuron.weights() {
            assert_eq!(arena.gradient(w), 0.0);
        }
    }

    #[test]
    fn backward_produces_local_gradients() {
        let xs = [1.5, -0.5];
        let ws = [0.3, -0.7, 0.2];
        let g = 2.0;
        let (mut arena, neuron) = wired(&xs, &ws, NeuronKind::Linear);
        neuron.forward(&mut arena);
        arena.set_gradient(neuron.output(), g);
        neuron.backward(&mut arena, None);

        let weights = neuron.weights();
        assert_eq!(arena.gradient(weights[0]), xs[0] * g);
        assert_eq!(arena.gradient(weights[1]), xs[1] * g);
        assert_eq!(arena.gradient(weights[2]), g);
        assert_eq!(arena.gradient(neuron.inputs()[0]), ws[0] * g);
        assert_eq!(arena.gradient(neuron.inputs()[1]), ws[1] * g);
    }

    #[test]
    fn gated_relu_blocks_gradients_and_updates() {
        let (mut arena, neuron) = wired(&[1.0, 2.0], &[-1.0, -1.0, 0.5], NeuronKind::ReLU);
        neuron.forward(&mut arena);
        assert_eq!(arena.value(neuron.output()), 0.0);

        arena.set_gradient(neuron.output(), 3.0);
        neuron.backward(&mut arena, Some(-0.1));

        for &w in neuron.weights() {
            assert_eq!(arena.gradient(w), 0.0);
        }
        for &x in neuron.inputs() {
            assert_eq!(arena.gradient(x), 0.0);
        }
        assert_eq!(arena.values(neuron.weights()), vec![-1.0, -1.0, 0.5]);
    }

    #[test]
    fn zero_step_leaves_weights_untouched() {
        let ws = [0.4, -0.9, 0.1];
        let (mut arena, neuron) = wired(&[3.0, 4.0], &ws, NeuronKind::Linear);
        neuron.forward(&mut arena);
        arena.set_gradient(neuron.output(), 5.0);
        neuron.backward(&mut arena, Some(0.0));
        assert_eq!(arena.values(neuron.weights()), ws.to_vec());
    }

    #[test]
    fn step_moves_weights_along_gradient() {
        let (mut arena, neuron) = wired(&[2.0], &[1.0, 0.0], NeuronKind::Linear);
        neuron.forward(&mut arena);
        arena.set_gradient(neuron.output(), 1.0);
        neuron.backward(&mut arena, Some(-0.5));
        // gradients are (2.0, 1.0)
        assert_eq!(arena.values(neuron.weights()), vec![0.0, -0.5]);
    }

    #[test]
    fn input_gradients_accumulate() {
        let (mut arena, neuron) = wired(&[1.0], &[2.0, 0.0], NeuronKind::Linear);
        neuron.forward(&mut arena);
        arena.set_gradient(neuron.inputs()[0], 1.0);
        arena.set_gradient(neuron.output(), 1.0);
        neuron.backward(&mut arena, None);
        assert_eq!(arena.gradient(neuron.inputs()[0]), 3.0);
    }

    #[test]
    fn from_parts_rejects_missing_bias() {
        let mut arena = CellArena::new();
        let inputs: Rc<[CellId]> = arena.alloc_many(2).into();
        let weights = arena.alloc_many(2);
        let output = arena.alloc(0.0);
        let err = Neuron::from_parts(inputs, output, weights, NeuronKind::Linear).unwrap_err();
        assert!(matches!(err, NetworkError::BiasConvention { weights: 2, inputs: 2 }));
    }

    #[test]
    fn new_allocates_bias_weight() {
        let mut arena = CellArena::new();
        let inputs: Rc<[CellId]> = arena.alloc_many(3).into();
        let mut next = 0.0;
        let mut counter = || { next += 1.0; next };
        let neuron = Neuron::new(&mut arena, inputs, NeuronKind::ReLU, &mut counter);
        assert_eq!(neuron.weights().len(), 4);
        assert_eq!(arena.value(neuron.bias()), 4.0);
        assert_eq!(arena.len(), 3 + 4 + 1);
    }
}
