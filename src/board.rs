use crate::food::FoodSpawner;
use crate::snake::{Cell, GridSnake};

/// Something that covers cells on the board and can be drawn there.
pub trait Occupant {
    /// Returns true if this occupant covers `cell`.
    fn occupies(&self, cell: Cell) -> bool;

    /// Cells to paint, in drawing order.
    fn render_cells(&self) -> Vec<Cell>;
}

impl Occupant for GridSnake {
    fn occupies(&self, cell: Cell) -> bool {
        GridSnake::occupies(self, cell)
    }

    fn render_cells(&self) -> Vec<Cell> {
        self.positions()
    }
}

impl Occupant for FoodSpawner {
    fn occupies(&self, cell: Cell) -> bool {
        self.position() == cell
    }

    fn render_cells(&self) -> Vec<Cell> {
        vec![self.position()]
    }
}
