use std::io;
use std::time::{Duration, Instant};

use tracing::info;

use crate::game::{Simulation, TickOutcome};
use crate::input::GameInput;

/// Source of player intents.
pub trait InputSource {
    /// Returns every input queued since the previous call, waiting at most
    /// `timeout` for the first one.
    fn poll(&mut self, timeout: Duration) -> io::Result<Vec<GameInput>>;
}

/// Consumer of tick outcomes. All drawing happens behind this trait.
pub trait Presenter {
    fn present(&mut self, outcome: &TickOutcome) -> io::Result<()>;
}

/// Gate deciding when the next tick runs.
pub trait Clock {
    /// Time left until the next tick is due.
    fn remaining(&self) -> Duration;

    /// Returns true and schedules the following tick when a tick is due.
    fn try_tick(&mut self) -> bool;
}

/// Wall-clock gate firing at a fixed rate.
#[derive(Debug, Clone)]
pub struct TickClock {
    interval: Duration,
    next_tick: Instant,
}

impl TickClock {
    /// Creates a clock firing `ticks_per_second` times per second, first
    /// after one full interval.
    #[must_use]
    pub fn new(ticks_per_second: u32) -> Self {
        let interval = Duration::from_secs(1) / ticks_per_second.max(1);
        Self {
            interval,
            next_tick: Instant::now() + interval,
        }
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Clock for TickClock {
    fn remaining(&self) -> Duration {
        self.next_tick.saturating_duration_since(Instant::now())
    }

    fn try_tick(&mut self) -> bool {
        let now = Instant::now();
        if now < self.next_tick {
            return false;
        }

        // Skip missed ticks instead of bursting to catch up.
        self.next_tick += self.interval;
        if self.next_tick <= now {
            self.next_tick = now + self.interval;
        }
        true
    }
}

/// Runs ticks until the input source reports quit. Returns the number of
/// ticks played.
pub fn run<I, P, C>(
    simulation: &mut Simulation,
    input: &mut I,
    presenter: &mut P,
    clock: &mut C,
) -> io::Result<u64>
where
    I: InputSource,
    P: Presenter,
    C: Clock,
{
    info!(
        width = simulation.bounds().width,
        height = simulation.bounds().height,
        "starting game loop"
    );
    presenter.present(&simulation.snapshot())?;

    let mut ticks = 0;
    loop {
        let inputs = input.poll(clock.remaining())?;
        if apply_inputs(simulation, inputs) {
            break;
        }

        if clock.try_tick() {
            let outcome = simulation.tick();
            presenter.present(&outcome)?;
            ticks += 1;
        }
    }

    info!(
        ticks,
        rounds_lost = simulation.rounds_lost(),
        rounds_won = simulation.rounds_won(),
        "quit requested"
    );
    Ok(ticks)
}

/// Feeds queued inputs to the simulation. Returns true on quit.
fn apply_inputs(simulation: &mut Simulation, inputs: Vec<GameInput>) -> bool {
    for input in inputs {
        match input {
            GameInput::Direction(direction) => simulation.set_pending_direction(direction),
            GameInput::Quit => return true,
        }
    }
    false
}
