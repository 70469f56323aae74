//! Snake on a wrap-around grid.
//!
//! The simulation ([`game::Simulation`]) is pure and tick-driven; the
//! terminal front end plugs into it through the traits in [`game_loop`].

pub mod board;
pub mod config;
pub mod error;
pub mod food;
pub mod game;
pub mod game_loop;
pub mod input;
pub mod renderer;
pub mod snake;
pub mod terminal_runtime;
