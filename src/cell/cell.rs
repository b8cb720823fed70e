/// A mutable (value, gradient) pair; the unit every neuron reads and writes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Cell {
    pub value: f64,
    pub gradient: f64,
}

impl Cell {
    pub fn new(value: f64) -> Cell {
        Cell { value, gradient: 0.0 }
    }
}

/// Handle to a cell stored in a `CellArena`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(usize);

impl CellId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Owning store for every cell of a network.
///
/// Neurons hold `CellId`s rather than references, so a single input cell can be
/// read by every neuron of a layer while the arena stays the only owner.
#[derive(Debug, Clone, Default)]
pub struct CellArena {
    cells: Vec<Cell>,
}

impl CellArena {
    pub fn new() -> CellArena {
        CellArena { cells: Vec::new() }
    }

    /// Allocates a new cell and returns its handle.
    pub fn alloc(&mut self, value: f64) -> CellId {
        self.cells.push(Cell::new(value));
        CellId(self.cells.len() - 1)
    }

    /// Allocates `count` zeroed cells.
    pub fn alloc_many(&mut self, count: usize) -> Vec<CellId> {
        (0..count).map(|_| self.alloc(0.0)).collect()
    }

    pub fn get(&self, id: CellId) -> &Cell {
        &self.cells[id.0]
    }

    pub fn get_mut(&mut self, id: CellId) -> &mut Cell {
        &mut self.cells[id.0]
    }

    pub fn value(&self, id: CellId) -> f64 {
        self.cells[id.0].value
    }

    pub fn gradient(&self, id: CellId) -> f64 {
        self.cells[id.0].gradient
    }

    pub fn set_value(&mut self, id: CellId, value: f64) {
        self.cells[id.0].value = value;
    }

    pub fn set_gradient(&mut self, id: CellId, gradient: f64) {
        self.cells[id.0].gradient = gradient;
    }

    /// Adds to a cell's gradient. Shared cells must only ever be accumulated into.
    pub fn add_gradient(&mut self, id: CellId, delta: f64) {
        self.cells[id.0].gradient += delta;
    }

    pub fn values(&self, ids: &[CellId]) -> Vec<f64> {
        ids.iter().map(|&id| self.value(id)).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
