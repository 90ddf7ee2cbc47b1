use crate::Cell;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("board dimensions must be positive, got {height}x{width}")]
    EmptyBoard { height: usize, width: usize },

    #[error("a {height}x{width} board has more cells than can be counted")]
    TooLarge { height: usize, width: usize },

    #[error("a {height}x{width} board cannot hold {mines} mines")]
    TooManyMines {
        height: usize,
        width: usize,
        mines: usize,
    },

    #[error("cell {cell} is outside the {height}x{width} board")]
    OutOfBounds {
        cell: Cell,
        height: usize,
        width: usize,
    },

    #[error("cell {cell} reported {count} mines but only has {neighbors} neighbors")]
    CountTooLarge {
        cell: Cell,
        count: usize,
        neighbors: usize,
    },

    #[error("game_ended")]
    GameOver,

    #[error("inconsistent knowledge: {0}")]
    Inconsistent(#[from] Contradiction),

    #[error("codec: {0}")]
    Codec(String),

    /// The SAT backend itself failed, which says nothing about the
    /// observations.
    #[error("solver: {0}")]
    Solver(String),
}

impl Error {
    /// True for failures that mean the knowledge base itself is broken, as
    /// opposed to a caller passing bad arguments.
    pub fn is_internal(&self) -> bool {
        matches!(self, Error::Inconsistent(_))
    }
}

impl From<bcs::Error> for Error {
    fn from(e: bcs::Error) -> Self {
        Error::Codec(e.to_string())
    }
}

/// Ways the accumulated facts can contradict each other.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Contradiction {
    #[error("sentence claims {count} mines among {cells} cells")]
    Overfull { cells: usize, count: usize },

    #[error("mine count dropped below zero at {0}")]
    Underflow(Cell),

    #[error("{0} is proven both safe and a mine")]
    SafeAndMine(Cell),

    #[error("the same cells carry counts {0} and {1}")]
    ConflictingCounts(usize, usize),

    #[error("{0} was concluded without being forced")]
    Unsound(Cell),

    #[error("no mine layout satisfies the observations")]
    Unsatisfiable,
}
