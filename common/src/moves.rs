use crate::agent::Agent;
use crate::cell::Cell;
use rand::Rng;
use rand::prelude::IndexedRandom;
use std::fmt;

/// The next cell to reveal, and whether the agent knows it is safe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Safe(Cell),
    Guess(Cell),
}

impl Move {
    pub fn cell(self) -> Cell {
        match self {
            Move::Safe(cell) | Move::Guess(cell) => cell,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Safe(cell) => write!(f, "safe move {cell}"),
            Move::Guess(cell) => write!(f, "guess {cell}"),
        }
    }
}

impl Agent {
    /// A proven-safe cell that has not been revealed yet. The smallest such
    /// cell in (row, col) order, so play under a fixed seed is repeatable.
    pub fn safe_move(&self) -> Option<Cell> {
        self.safes.difference(&self.moves_made).min().copied()
    }

    /// A uniformly random cell that is neither revealed nor a known mine.
    pub fn random_move<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Cell> {
        let candidates: Vec<Cell> = self
            .dimensions()
            .cells()
            .filter(|cell| !self.mines.contains(cell) && !self.moves_made.contains(cell))
            .collect();
        candidates.choose(rng).copied()
    }

    /// Prefers a safe move, falling back to a random guess.
    pub fn next_move<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Move> {
        self.safe_move()
            .map(Move::Safe)
            .or_else(|| self.random_move(rng).map(Move::Guess))
    }
}
