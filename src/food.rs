use std::collections::HashSet;

use rand::Rng;

use crate::config::GridSize;
use crate::snake::Cell;

/// Single food cell that can move itself to a free cell.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct FoodSpawner {
    position: Cell,
}

impl FoodSpawner {
    /// Creates food at a fixed `position`.
    #[must_use]
    pub fn at(position: Cell) -> Self {
        Self { position }
    }

    /// Places food at any cell of an empty board.
    #[must_use]
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, bounds: GridSize) -> Self {
        Self::at(random_cell(rng, bounds))
    }

    #[must_use]
    pub fn position(&self) -> Cell {
        self.position
    }

    /// Moves the food to a uniformly random cell not in `occupied`.
    ///
    /// Returns `false` and keeps the current position when every cell is
    /// occupied.
    pub fn relocate<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        bounds: GridSize,
        occupied: &HashSet<Cell>,
    ) -> bool {
        match free_cell(rng, bounds, occupied) {
            Some(cell) => {
                self.position = cell;
                true
            }
            None => false,
        }
    }
}

/// Picks a uniformly random cell outside `occupied`, or `None` when the
/// board is full.
///
/// Rejection sampling is used while at most half the board is occupied;
/// past that the free cells are listed and one is drawn from the list.
#[must_use]
pub fn free_cell<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: GridSize,
    occupied: &HashSet<Cell>,
) -> Option<Cell> {
    let total = bounds.total_cells();
    if total == 0 {
        return None;
    }

    if occupied.len() * 2 <= total {
        loop {
            let candidate = random_cell(rng, bounds);
            if !occupied.contains(&candidate) {
                return Some(candidate);
            }
        }
    }

    let mut candidates = Vec::with_capacity(total.saturating_sub(occupied.len()));
    for y in 0..i32::from(bounds.height) {
        for x in 0..i32::from(bounds.width) {
            let cell = Cell::new(x, y);
            if !occupied.contains(&cell) {
                candidates.push(cell);
            }
        }
    }

    if candidates.is_empty() {
        return None;
    }

    let index = rng.gen_range(0..candidates.len());
    Some(candidates[index])
}

fn random_cell<R: Rng + ?Sized>(rng: &mut R, bounds: GridSize) -> Cell {
    Cell::new(
        rng.gen_range(0..i32::from(bounds.width)),
        rng.gen_range(0..i32::from(bounds.height)),
    )
}
