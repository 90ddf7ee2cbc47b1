mod agent;
mod board;
mod cell;
mod config;
mod error;
mod game;
mod moves;
pub mod oracle;
mod sentence;

pub use agent::{Agent, Inference};
pub use board::Board;
pub use cell::{Cell, Dimensions};
pub use config::GameConfig;
pub use error::{Contradiction, Error, Result};
pub use game::{Game, GameState};
pub use moves::Move;
pub use oracle::DeducedState;
pub use sentence::Sentence;
