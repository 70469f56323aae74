use std::io;
use std::time::Duration;

use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::config::GridSize;
use crate::game::TickOutcome;
use crate::game_loop::{InputSource, Presenter};
use crate::input::{GameInput, map_key_event};
use crate::renderer::{self, BoardCanvas};

/// Concrete terminal type used by the runtime.
pub type AppTerminal = Terminal<CrosstermBackend<io::Stdout>>;

/// Owns terminal lifecycle (raw mode + alternate screen) for one game session.
///
/// On drop, this type restores terminal state best-effort.
pub struct TerminalSession {
    terminal: AppTerminal,
}

impl TerminalSession {
    /// Enters raw mode, switches to alternate screen, and creates a ratatui terminal.
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        if let Err(error) = execute!(stdout, EnterAlternateScreen, Hide) {
            let _ = disable_raw_mode();
            return Err(error);
        }

        let backend = CrosstermBackend::new(stdout);
        match Terminal::new(backend) {
            Ok(terminal) => Ok(Self { terminal }),
            Err(error) => {
                let _ = cleanup_terminal_best_effort();
                Err(error)
            }
        }
    }

    /// Returns mutable access to the inner ratatui terminal.
    pub fn terminal_mut(&mut self) -> &mut AppTerminal {
        &mut self.terminal
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = cleanup_terminal_best_effort();
    }
}

/// Restores the terminal without reporting failures; safe to call twice.
pub fn cleanup_terminal_best_effort() -> io::Result<()> {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    execute!(stdout, Show, LeaveAlternateScreen)
}

/// Presenter drawing a retained board canvas into the terminal.
pub struct TerminalPresenter {
    session: TerminalSession,
    canvas: BoardCanvas,
}

impl TerminalPresenter {
    #[must_use]
    pub fn new(session: TerminalSession, bounds: GridSize) -> Self {
        Self {
            session,
            canvas: BoardCanvas::new(bounds),
        }
    }
}

impl Presenter for TerminalPresenter {
    fn present(&mut self, outcome: &TickOutcome) -> io::Result<()> {
        self.canvas.apply(outcome);

        let canvas = &self.canvas;
        self.session
            .terminal_mut()
            .draw(|frame| renderer::render(frame, canvas))?;
        Ok(())
    }
}

/// Keyboard input read through crossterm events.
#[derive(Debug, Default)]
pub struct TerminalInput;

impl InputSource for TerminalInput {
    fn poll(&mut self, timeout: Duration) -> io::Result<Vec<GameInput>> {
        let mut inputs = Vec::new();
        if !event::poll(timeout)? {
            return Ok(inputs);
        }

        loop {
            if let Event::Key(key) = event::read()? {
                if let Some(input) = map_key_event(key) {
                    inputs.push(input);
                }
            }

            if !event::poll(Duration::ZERO)? {
                break;
            }
        }

        Ok(inputs)
    }
}
