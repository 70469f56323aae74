use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Widget};
use ratatui::Frame;

use crate::config::{
    GridSize, BOARD_BACKGROUND_COLOR, BORDER_COLOR, FOOD_COLOR, GLYPH_CELL, SNAKE_COLOR,
};
use crate::game::TickOutcome;
use crate::snake::Cell;

/// Terminal columns per grid cell; keeps cells roughly square.
const COLUMNS_PER_CELL: u16 = 2;

/// What a canvas cell currently shows.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Paint {
    Empty,
    Snake,
    Food,
}

/// Retained picture of the board, updated incrementally from tick outcomes.
///
/// Only cells named by an outcome are touched: the vacated tail is erased,
/// the body and food are painted, and on a reset every pre-reset body cell
/// is erased.
#[derive(Debug, Clone)]
pub struct BoardCanvas {
    bounds: GridSize,
    cells: Vec<Paint>,
    food: Option<Cell>,
    length: usize,
}

impl BoardCanvas {
    #[must_use]
    pub fn new(bounds: GridSize) -> Self {
        Self {
            bounds,
            cells: vec![Paint::Empty; bounds.total_cells()],
            food: None,
            length: 0,
        }
    }

    /// Applies one outcome to the picture.
    pub fn apply(&mut self, outcome: &TickOutcome) {
        if let Some(tail) = outcome.last_tail {
            self.set(tail, Paint::Empty);
        }

        let body_paint = if outcome.round_ended() {
            Paint::Empty
        } else {
            Paint::Snake
        };
        for cell in &outcome.positions {
            self.set(*cell, body_paint);
        }
        self.length = if outcome.round_ended() {
            0
        } else {
            outcome.positions.len()
        };

        if let Some(previous) = self.food {
            if previous != outcome.food_position && self.get(previous) == Paint::Food {
                self.set(previous, Paint::Empty);
            }
        }
        self.set(outcome.food_position, Paint::Food);
        self.food = Some(outcome.food_position);
    }

    /// Returns the paint at `cell`; out-of-bounds cells read as empty.
    #[must_use]
    pub fn get(&self, cell: Cell) -> Paint {
        self.index(cell)
            .map_or(Paint::Empty, |index| self.cells[index])
    }

    /// Snake length as of the last applied outcome; zero right after a reset.
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    #[must_use]
    pub fn bounds(&self) -> GridSize {
        self.bounds
    }

    fn set(&mut self, cell: Cell, paint: Paint) {
        if let Some(index) = self.index(cell) {
            self.cells[index] = paint;
        }
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        if !cell.is_within_bounds(self.bounds) {
            return None;
        }

        let x = usize::try_from(cell.x).ok()?;
        let y = usize::try_from(cell.y).ok()?;
        Some(y * usize::from(self.bounds.width) + x)
    }
}

impl Widget for &BoardCanvas {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, Style::new().bg(BOARD_BACKGROUND_COLOR));

        for y in 0..i32::from(self.bounds.height) {
            for x in 0..i32::from(self.bounds.width) {
                let cell = Cell::new(x, y);
                let color = match self.get(cell) {
                    Paint::Empty => continue,
                    Paint::Snake => SNAKE_COLOR,
                    Paint::Food => FOOD_COLOR,
                };

                let Some((column, row)) = logical_to_terminal(area, cell) else {
                    continue;
                };
                buf.set_string(
                    column,
                    row,
                    GLYPH_CELL,
                    Style::new().fg(color).bg(BOARD_BACKGROUND_COLOR),
                );
            }
        }
    }
}

/// Draws the bordered board into the frame.
pub fn render(frame: &mut Frame<'_>, canvas: &BoardCanvas) {
    let area = board_area(frame.area(), canvas.bounds());
    let block = Block::bordered()
        .title(format!(" snake | length {} ", canvas.length()))
        .border_style(Style::new().fg(BORDER_COLOR).bg(BOARD_BACKGROUND_COLOR));

    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(canvas, inner);
}

/// Returns the bordered rectangle sized to the grid, clipped to `area`.
fn board_area(area: Rect, bounds: GridSize) -> Rect {
    let width = bounds
        .width
        .saturating_mul(COLUMNS_PER_CELL)
        .saturating_add(2)
        .min(area.width);
    let height = bounds.height.saturating_add(2).min(area.height);
    Rect::new(area.x, area.y, width, height)
}

fn logical_to_terminal(inner: Rect, cell: Cell) -> Option<(u16, u16)> {
    let x_offset = u16::try_from(cell.x).ok()?.checked_mul(COLUMNS_PER_CELL)?;
    let y_offset = u16::try_from(cell.y).ok()?;

    let x = inner.x.saturating_add(x_offset);
    let y = inner.y.saturating_add(y_offset);
    if x.saturating_add(COLUMNS_PER_CELL) > inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}
