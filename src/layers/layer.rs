use std::rc::Rc;

use crate::activation::activation::NeuronKind;
use crate::cell::cell::{CellArena, CellId};
use crate::neuron::neuron::Neuron;

/// A group of neurons that all read the same input cells.
#[derive(Debug, Clone)]
pub struct Layer {
    inputs: Rc<[CellId]>,
    neurons: Vec<Neuron>,
    outputs: Vec<CellId>,
    kind: NeuronKind,
}

impl Layer {
    /// Creates `size` neurons over `inputs`. Each neuron gets its own output
    /// and weight cells; the input cells are shared.
    pub fn new<G: FnMut() -> f64>(
        arena: &mut CellArena,
        inputs: Rc<[CellId]>,
        size: usize,
        kind: NeuronKind,
        generator: &mut G,
    ) -> Layer {
        let neurons: Vec<Neuron> = (0..size)
            .map(|_| Neuron::new(&mut *arena, Rc::clone(&inputs), kind, &mut *generator))
            .collect();
        let outputs = neurons.iter().map(Neuron::output).collect();
        Layer { inputs, neurons, outputs, kind }
    }

    pub fn forward(&self, arena: &mut CellArena) {
        for neuron in &self.neurons {
            neuron.forward(arena);
        }
    }

    /// Every output gradient must be seeded before this is called.
    pub fn backward(&self, arena: &mut CellArena, step_size: Option<f64>) {
        for neuron in &self.neurons {
            neuron.backward(arena, step_size);
        }
    }

    /// Zeroes the gradient of every input cell so the neurons can accumulate
    /// into them from scratch.
    pub fn reset_input_gradients(&self, arena: &mut CellArena) {
        for &input in self.inputs.iter() {
            arena.set_gradient(input, 0.0);
        }
    }

    /// The output cell of every neuron, in neuron order.
    pub fn outputs(&self) -> &[CellId] {
        &self.outputs
    }

    pub fn inputs(&self) -> &[CellId] {
        &self.inputs
    }

    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    pub fn input_size(&self) -> usize {
        self.inputs.len()
    }

    pub fn len(&self) -> usize {
        self.neurons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neurons.is_empty()
    }

    pub fn kind(&self) -> NeuronKind {
        self.kind
    }
}
