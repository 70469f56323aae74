use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::board::Occupant;
use crate::config::GridSize;
use crate::food::FoodSpawner;
use crate::input::Direction;
use crate::snake::{Cell, GridSnake};

/// Everything the presentation layer needs to draw one tick.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TickOutcome {
    /// Snake body after the tick, head first. When the round ended this is
    /// the body as it was before the reset.
    pub positions: Vec<Cell>,
    /// Cell vacated by the tail this tick.
    pub last_tail: Option<Cell>,
    pub food_position: Cell,
    /// The head ran into the body and the snake was reset.
    pub collided: bool,
    /// The snake covered the whole grid and was reset.
    pub filled_grid: bool,
}

impl TickOutcome {
    /// Returns true when the snake was reset during this tick.
    #[must_use]
    pub fn round_ended(&self) -> bool {
        self.collided || self.filled_grid
    }
}

/// Complete simulation state for one session.
///
/// Owns the snake and the food exclusively; callers observe the board
/// only through [`TickOutcome`] and read-only accessors.
#[derive(Debug, Clone)]
pub struct Simulation {
    snake: GridSnake,
    food: FoodSpawner,
    bounds: GridSize,
    tick_count: u64,
    rounds_lost: u64,
    rounds_won: u64,
    rng: StdRng,
}

impl Simulation {
    /// Creates a simulation seeded from OS entropy.
    #[must_use]
    pub fn new(bounds: GridSize) -> Self {
        Self::with_rng(bounds, StdRng::from_entropy())
    }

    /// Creates a deterministic simulation for tests and reproducible runs.
    #[must_use]
    pub fn new_with_seed(bounds: GridSize, seed: u64) -> Self {
        Self::with_rng(bounds, StdRng::seed_from_u64(seed))
    }

    fn with_rng(bounds: GridSize, mut rng: StdRng) -> Self {
        let snake = GridSnake::new(bounds);
        let mut food = FoodSpawner::spawn(&mut rng, bounds);
        move_food_off_snake(&mut rng, bounds, &mut food, &snake);

        Self {
            snake,
            food,
            bounds,
            tick_count: 0,
            rounds_lost: 0,
            rounds_won: 0,
            rng,
        }
    }

    /// Forwards a steering request to the snake. Reversals are dropped.
    pub fn set_pending_direction(&mut self, direction: Direction) {
        self.snake.set_pending_direction(direction);
    }

    /// Advances the simulation by one tick.
    ///
    /// Food is resolved before collision: the tail is kept when the new head
    /// lands on the food, otherwise it is dropped, and only then is the head
    /// checked against the body.
    pub fn tick(&mut self) -> TickOutcome {
        self.tick_count += 1;

        self.snake.commit_direction();
        self.snake.advance();

        let head = self.snake.head();
        let mut filled_grid = false;
        if self.food.occupies(head) {
            self.snake.grow();
            let occupied = self.snake.occupied_cells();
            if !self.food.relocate(&mut self.rng, self.bounds, &occupied) {
                filled_grid = true;
            }
            debug!(
                tick = self.tick_count,
                length = self.snake.len(),
                "food eaten"
            );
        } else {
            self.snake.pop_tail();
        }

        let collided = self.snake.contains_self_collision();
        let last_tail = self.snake.last_tail();

        if collided || filled_grid {
            let positions = self.snake.positions();
            self.end_round(collided);

            return TickOutcome {
                positions,
                last_tail,
                food_position: self.food.position(),
                collided,
                filled_grid,
            };
        }

        TickOutcome {
            positions: self.snake.positions(),
            last_tail,
            food_position: self.food.position(),
            collided: false,
            filled_grid: false,
        }
    }

    /// Describes the current board without advancing it.
    #[must_use]
    pub fn snapshot(&self) -> TickOutcome {
        TickOutcome {
            positions: self.snake.render_cells(),
            last_tail: None,
            food_position: self.food.position(),
            collided: false,
            filled_grid: false,
        }
    }

    fn end_round(&mut self, collided: bool) {
        let final_length = self.snake.len();
        if collided {
            self.rounds_lost += 1;
            info!(
                tick = self.tick_count,
                length = final_length,
                rounds_lost = self.rounds_lost,
                "snake collided with itself"
            );
        } else {
            self.rounds_won += 1;
            info!(
                tick = self.tick_count,
                length = final_length,
                rounds_won = self.rounds_won,
                "snake filled the grid"
            );
        }

        self.snake.reset();
        move_food_off_snake(&mut self.rng, self.bounds, &mut self.food, &self.snake);
    }

    /// Replaces the snake, e.g. to set up a specific board. Food under the
    /// new body is moved to a free cell.
    pub fn set_snake(&mut self, snake: GridSnake) {
        debug_assert_eq!(snake.bounds(), self.bounds);
        self.snake = snake;
        move_food_off_snake(&mut self.rng, self.bounds, &mut self.food, &self.snake);
    }

    /// Moves the food to `cell`, wrapped into the grid.
    pub fn place_food(&mut self, cell: Cell) {
        self.food = FoodSpawner::at(cell.wrapped(self.bounds));
    }

    #[must_use]
    pub fn snake(&self) -> &GridSnake {
        &self.snake
    }

    #[must_use]
    pub fn food(&self) -> &FoodSpawner {
        &self.food
    }

    #[must_use]
    pub fn bounds(&self) -> GridSize {
        self.bounds
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    #[must_use]
    pub fn rounds_lost(&self) -> u64 {
        self.rounds_lost
    }

    #[must_use]
    pub fn rounds_won(&self) -> u64 {
        self.rounds_won
    }
}

/// Relocates `food` when the snake covers it.
///
/// A 1x1 grid has no free cell once the snake exists, so there the food
/// stays under the snake.
fn move_food_off_snake(
    rng: &mut StdRng,
    bounds: GridSize,
    food: &mut FoodSpawner,
    snake: &GridSnake,
) {
    if !snake.occupies(food.position()) {
        return;
    }

    if !food.relocate(rng, bounds, &snake.occupied_cells()) {
        debug!(
            x = food.position().x,
            y = food.position().y,
            "no free cell for food; it stays under the snake"
        );
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use crate::config::GridSize;
    use crate::food::FoodSpawner;
    use crate::input::Direction;
    use crate::snake::{Cell, GridSnake};

    use super::Simulation;

    const SMALL: GridSize = GridSize {
        width: 4,
        height: 4,
    };

    #[test]
    fn snake_wraps_around_right_edge() {
        let mut sim = Simulation::new_with_seed(SMALL, 1);
        sim.place_food(Cell::new(0, 0));
        assert_eq!(sim.snake().positions(), vec![Cell::new(2, 2)]);

        let first = sim.tick();
        assert_eq!(first.positions, vec![Cell::new(3, 2)]);
        assert_eq!(first.last_tail, Some(Cell::new(2, 2)));

        let second = sim.tick();
        assert_eq!(second.positions, vec![Cell::new(0, 2)]);
        assert!(!second.collided);
    }

    #[test]
    fn eating_food_grows_and_relocates_food() {
        let mut sim = Simulation::new_with_seed(SMALL, 2);
        sim.place_food(Cell::new(3, 2));

        let outcome = sim.tick();

        assert_eq!(outcome.positions, vec![Cell::new(3, 2), Cell::new(2, 2)]);
        assert_eq!(outcome.last_tail, None);
        assert!(!outcome.positions.contains(&outcome.food_position));
        assert!(outcome.food_position.is_within_bounds(SMALL));
    }

    #[test]
    fn self_collision_reports_pre_reset_body_and_resets() {
        let bounds = GridSize {
            width: 6,
            height: 6,
        };
        let mut sim = Simulation::new_with_seed(bounds, 3);
        sim.set_snake(GridSnake::from_segments(
            bounds,
            vec![
                Cell::new(1, 1),
                Cell::new(1, 2),
                Cell::new(1, 3),
                Cell::new(1, 4),
            ],
            Direction::Down,
        ));
        sim.place_food(Cell::new(5, 5));

        let outcome = sim.tick();

        assert!(outcome.collided);
        assert!(!outcome.filled_grid);
        assert_eq!(
            outcome.positions,
            vec![
                Cell::new(1, 2),
                Cell::new(1, 1),
                Cell::new(1, 2),
                Cell::new(1, 3),
            ]
        );
        assert_eq!(outcome.last_tail, Some(Cell::new(1, 4)));
        assert_eq!(sim.snake().positions(), vec![Cell::new(3, 3)]);
        assert_eq!(sim.snake().direction(), Direction::Right);
        assert_eq!(sim.snake().pending_direction(), None);
        assert_eq!(sim.rounds_lost(), 1);
    }

    #[test]
    fn moving_into_vacating_tail_is_not_a_collision() {
        let bounds = GridSize {
            width: 6,
            height: 6,
        };
        let mut sim = Simulation::new_with_seed(bounds, 4);
        sim.set_snake(GridSnake::from_segments(
            bounds,
            vec![
                Cell::new(2, 2),
                Cell::new(3, 2),
                Cell::new(3, 3),
                Cell::new(2, 3),
            ],
            Direction::Down,
        ));
        sim.place_food(Cell::new(5, 5));

        let outcome = sim.tick();

        assert!(!outcome.collided);
        assert_eq!(outcome.positions[0], Cell::new(2, 3));
        assert_eq!(outcome.positions.len(), 4);
    }

    #[test]
    fn reverse_request_does_not_change_heading() {
        let mut sim = Simulation::new_with_seed(SMALL, 5);
        sim.place_food(Cell::new(0, 0));

        sim.set_pending_direction(Direction::Left);
        assert_eq!(sim.snake().pending_direction(), None);

        let outcome = sim.tick();
        assert_eq!(outcome.positions, vec![Cell::new(3, 2)]);
    }

    #[test]
    fn filling_the_grid_ends_the_round() {
        let bounds = GridSize {
            width: 2,
            height: 1,
        };
        let mut sim = Simulation::new_with_seed(bounds, 6);
        assert_eq!(sim.snake().positions(), vec![Cell::new(1, 0)]);
        sim.place_food(Cell::new(0, 0));

        let outcome = sim.tick();

        assert!(outcome.filled_grid);
        assert!(!outcome.collided);
        assert_eq!(outcome.positions, vec![Cell::new(0, 0), Cell::new(1, 0)]);
        assert_eq!(sim.snake().positions(), vec![Cell::new(1, 0)]);
        assert_eq!(outcome.food_position, Cell::new(0, 0));
        assert_eq!(sim.rounds_won(), 1);
    }

    #[test]
    fn one_cell_grid_resets_on_every_tick() {
        let bounds = GridSize {
            width: 1,
            height: 1,
        };
        let mut sim = Simulation::new_with_seed(bounds, 7);
        assert_eq!(sim.food().position(), Cell::new(0, 0));

        for _ in 0..3 {
            let outcome = sim.tick();
            assert!(outcome.collided);
            assert!(outcome.filled_grid);
            assert_eq!(outcome.last_tail, None);
            assert_eq!(outcome.food_position, Cell::new(0, 0));
            assert_eq!(sim.snake().len(), 1);
        }
    }

    #[test]
    fn food_on_reset_cell_moves_after_collision() {
        let bounds = GridSize {
            width: 6,
            height: 6,
        };
        let center = Cell::new(3, 3);

        for seed in 0..50 {
            let mut sim = Simulation::new_with_seed(bounds, seed);
            sim.set_snake(GridSnake::from_segments(
                bounds,
                vec![
                    Cell::new(1, 1),
                    Cell::new(1, 2),
                    Cell::new(1, 3),
                    Cell::new(1, 4),
                ],
                Direction::Down,
            ));
            sim.place_food(center);

            let outcome = sim.tick();

            assert!(outcome.collided);
            assert_ne!(sim.food().position(), center);
            assert_eq!(outcome.food_position, sim.food().position());
            assert!(!sim.snake().occupies(sim.food().position()));
        }
    }

    #[test]
    fn initial_food_never_starts_on_the_snake() {
        let bounds = GridSize {
            width: 2,
            height: 2,
        };
        let center = Cell::new(1, 1);

        let colliding_seed = (0..500)
            .find(|seed| {
                let mut rng = StdRng::seed_from_u64(*seed);
                FoodSpawner::spawn(&mut rng, bounds).position() == center
            })
            .expect("some seed should draw the center cell first");

        let sim = Simulation::new_with_seed(bounds, colliding_seed);

        assert_eq!(sim.snake().head(), center);
        assert_ne!(sim.food().position(), center);
    }

    #[test]
    fn replacing_the_snake_moves_covered_food() {
        let mut sim = Simulation::new_with_seed(SMALL, 12);
        sim.place_food(Cell::new(1, 0));

        sim.set_snake(GridSnake::from_segments(
            SMALL,
            vec![Cell::new(1, 0), Cell::new(0, 0)],
            Direction::Right,
        ));

        assert!(!sim.snake().occupies(sim.food().position()));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic]
    fn replacing_the_snake_rejects_other_grid_sizes() {
        let mut sim = Simulation::new_with_seed(SMALL, 13);
        let wider = GridSize {
            width: 8,
            height: 4,
        };

        sim.set_snake(GridSnake::new(wider));
    }

    #[test]
    fn random_play_preserves_board_invariants() {
        let bounds = GridSize {
            width: 7,
            height: 5,
        };
        let directions = [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ];
        let mut sim = Simulation::new_with_seed(bounds, 8);
        let mut steering = StdRng::seed_from_u64(99);

        for _ in 0..2_000 {
            if steering.gen_bool(0.3) {
                sim.set_pending_direction(directions[steering.gen_range(0..4)]);
            }

            let length_before = sim.snake().len();
            let food_before = sim.food().position();
            let outcome = sim.tick();

            assert!(outcome
                .positions
                .iter()
                .all(|cell| cell.is_within_bounds(bounds)));

            if outcome.round_ended() {
                assert_eq!(sim.snake().len(), 1);
                assert_eq!(sim.snake().head(), Cell::new(3, 2));
                assert!(!sim.snake().occupies(sim.food().position()));
                assert_eq!(outcome.food_position, sim.food().position());
                continue;
            }

            if outcome.positions[0] == food_before {
                assert_eq!(outcome.positions.len(), length_before + 1);
            } else {
                assert_eq!(outcome.positions.len(), length_before);
            }
            assert!(!outcome.positions.contains(&outcome.food_position));
        }

        assert_eq!(sim.tick_count(), 2_000);
    }

    #[test]
    fn snapshot_does_not_advance() {
        let sim = Simulation::new_with_seed(SMALL, 10);

        let snapshot = sim.snapshot();

        assert_eq!(snapshot.positions, vec![Cell::new(2, 2)]);
        assert_eq!(snapshot.food_position, sim.food().position());
        assert_eq!(sim.tick_count(), 0);
    }
}
