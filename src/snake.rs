use std::collections::{HashSet, VecDeque};

use crate::config::GridSize;
use crate::input::{direction_change_is_valid, Direction};

/// Grid cell in logical coordinates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns true when the cell lies inside the bounds.
    #[must_use]
    pub fn is_within_bounds(self, bounds: GridSize) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.x < i32::from(bounds.width)
            && self.y < i32::from(bounds.height)
    }

    /// Returns this cell wrapped into bounds on both axes.
    #[must_use]
    pub fn wrapped(self, bounds: GridSize) -> Self {
        Self {
            x: self.x.rem_euclid(i32::from(bounds.width)),
            y: self.y.rem_euclid(i32::from(bounds.height)),
        }
    }

    /// Returns the neighbouring cell one step in `direction`, wrapped.
    #[must_use]
    pub fn step(self, direction: Direction, bounds: GridSize) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(self.x + dx, self.y + dy).wrapped(bounds)
    }

    /// Returns the center cell of `bounds`, rounding down.
    #[must_use]
    pub fn center_of(bounds: GridSize) -> Self {
        Self::new(i32::from(bounds.width / 2), i32::from(bounds.height / 2))
    }
}

/// Snake body on a wrap-around grid with a one-slot direction buffer.
///
/// Length is always the body length; there is no separate counter.
#[derive(Debug, Clone)]
pub struct GridSnake {
    body: VecDeque<Cell>,
    direction: Direction,
    pending_direction: Option<Direction>,
    last_tail: Option<Cell>,
    bounds: GridSize,
}

impl GridSnake {
    /// Heading of a freshly created or reset snake.
    pub const START_DIRECTION: Direction = Direction::Right;

    /// Creates a one-cell snake at the grid center heading right.
    #[must_use]
    pub fn new(bounds: GridSize) -> Self {
        debug_assert!(bounds.width > 0 && bounds.height > 0);

        Self {
            body: VecDeque::from([Cell::center_of(bounds)]),
            direction: Self::START_DIRECTION,
            pending_direction: None,
            last_tail: None,
            bounds,
        }
    }

    /// Creates a snake from explicit body segments (front is head).
    ///
    /// Segments are wrapped into `bounds`. An empty list yields the start cell.
    #[must_use]
    pub fn from_segments(bounds: GridSize, segments: Vec<Cell>, direction: Direction) -> Self {
        let mut body: VecDeque<Cell> = segments
            .into_iter()
            .map(|cell| cell.wrapped(bounds))
            .collect();
        if body.is_empty() {
            body.push_front(Cell::center_of(bounds));
        }

        Self {
            body,
            direction,
            pending_direction: None,
            last_tail: None,
            bounds,
        }
    }

    /// Records `direction` for the next tick unless it reverses the current
    /// heading. The latest accepted call wins.
    pub fn set_pending_direction(&mut self, direction: Direction) {
        if !direction_change_is_valid(self.direction, direction) {
            return;
        }
        self.pending_direction = Some(direction);
    }

    /// Promotes the pending direction, if any, to the current heading.
    pub fn commit_direction(&mut self) {
        if let Some(direction) = self.pending_direction.take() {
            self.direction = direction;
        }
    }

    /// Prepends the next head cell. The tail is left in place; see
    /// [`GridSnake::pop_tail`] and [`GridSnake::grow`].
    pub fn advance(&mut self) {
        let next_head = self.head().step(self.direction, self.bounds);
        self.last_tail = None;
        self.body.push_front(next_head);
    }

    /// Drops the tail cell and remembers it as vacated this tick.
    ///
    /// A one-cell body is never emptied.
    pub fn pop_tail(&mut self) -> Option<Cell> {
        if self.body.len() <= 1 {
            return None;
        }

        self.last_tail = self.body.pop_back();
        self.last_tail
    }

    /// Keeps the tail this tick. Length follows from the body itself, so the
    /// only effect is that nothing is reported as vacated.
    pub fn grow(&mut self) {
        self.last_tail = None;
    }

    /// Returns true if the head overlaps any non-head segment.
    #[must_use]
    pub fn contains_self_collision(&self) -> bool {
        let head = self.head();
        self.body.iter().skip(1).any(|segment| *segment == head)
    }

    /// Restores the one-cell start state.
    pub fn reset(&mut self) {
        *self = Self::new(self.bounds);
    }

    /// Returns the current head cell.
    #[must_use]
    pub fn head(&self) -> Cell {
        match self.body.front() {
            Some(head) => *head,
            None => Cell::center_of(self.bounds),
        }
    }

    /// Returns true if any segment occupies `cell`.
    #[must_use]
    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Returns current segment count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Returns true when there are no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn pending_direction(&self) -> Option<Direction> {
        self.pending_direction
    }

    /// Cell vacated by the most recent tail pop, cleared on every advance.
    #[must_use]
    pub fn last_tail(&self) -> Option<Cell> {
        self.last_tail
    }

    #[must_use]
    pub fn bounds(&self) -> GridSize {
        self.bounds
    }

    /// Copies the body, head first.
    #[must_use]
    pub fn positions(&self) -> Vec<Cell> {
        self.body.iter().copied().collect()
    }

    /// Returns the set of occupied cells.
    #[must_use]
    pub fn occupied_cells(&self) -> HashSet<Cell> {
        self.body.iter().copied().collect()
    }
}
