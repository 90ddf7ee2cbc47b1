use crate::cell::{Cell, Dimensions};
use crate::error::{Error, Result};
use rand::Rng;
use std::collections::HashSet;
use std::fmt;

/// Ground truth for one game: where the mines are, and which of them the
/// player has flagged so far.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawBoard")]
pub struct Board {
    dims: Dimensions,
    mine_layout: HashSet<Cell>,
    marked_found: HashSet<Cell>,
}

/// Unchecked wire form of [`Board`].
#[derive(serde::Deserialize)]
struct RawBoard {
    dims: Dimensions,
    mine_layout: HashSet<Cell>,
    marked_found: HashSet<Cell>,
}

impl TryFrom<RawBoard> for Board {
    type Error = Error;

    fn try_from(raw: RawBoard) -> Result<Self> {
        for &cell in raw.mine_layout.iter().chain(&raw.marked_found) {
            raw.dims.check(cell)?;
        }
        Ok(Board {
            dims: raw.dims,
            mine_layout: raw.mine_layout,
            marked_found: raw.marked_found,
        })
    }
}

impl Board {
    /// Builds a board with `mine_count` mines placed uniformly at random.
    pub fn new(height: usize, width: usize, mine_count: usize) -> Result<Self> {
        Self::with_rng(height, width, mine_count, &mut rand::rng())
    }

    /// Same as [`Board::new`] but drawing from the caller's generator, so a
    /// seeded rng reproduces a layout.
    pub fn with_rng<R: Rng + ?Sized>(
        height: usize,
        width: usize,
        mine_count: usize,
        rng: &mut R,
    ) -> Result<Self> {
        let dims = Dimensions::new(height, width)?;
        if mine_count > dims.area() {
            return Err(Error::TooManyMines {
                height,
                width,
                mines: mine_count,
            });
        }

        // Rejection sampling: repeat draws are simply absorbed by the set.
        let mut mine_layout = HashSet::with_capacity(mine_count);
        while mine_layout.len() != mine_count {
            let cell = Cell::new(rng.random_range(0..height), rng.random_range(0..width));
            mine_layout.insert(cell);
        }

        Ok(Board {
            dims,
            mine_layout,
            marked_found: HashSet::new(),
        })
    }

    /// Builds a board with a fixed layout.
    pub fn from_mines(
        height: usize,
        width: usize,
        mines: impl IntoIterator<Item = Cell>,
    ) -> Result<Self> {
        let dims = Dimensions::new(height, width)?;
        let mine_layout = mines
            .into_iter()
            .map(|cell| dims.check(cell))
            .collect::<Result<HashSet<_>>>()?;
        Ok(Board {
            dims,
            mine_layout,
            marked_found: HashSet::new(),
        })
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    pub fn height(&self) -> usize {
        self.dims.height()
    }

    pub fn width(&self) -> usize {
        self.dims.width()
    }

    pub fn mine_count(&self) -> usize {
        self.mine_layout.len()
    }

    pub fn mines(&self) -> &HashSet<Cell> {
        &self.mine_layout
    }

    pub fn marked_found(&self) -> &HashSet<Cell> {
        &self.marked_found
    }

    pub fn is_mine(&self, cell: Cell) -> Result<bool> {
        let cell = self.dims.check(cell)?;
        Ok(self.mine_layout.contains(&cell))
    }

    /// Number of mines in the neighbourhood of `cell`, not counting the cell
    /// itself.
    pub fn neighbor_mine_count(&self, cell: Cell) -> Result<usize> {
        let cell = self.dims.check(cell)?;
        Ok(self
            .dims
            .neighbors(cell)
            .filter(|n| self.mine_layout.contains(n))
            .count())
    }

    /// Records that the player flagged `cell` as a mine.
    pub fn mark_found(&mut self, cell: Cell) -> Result<()> {
        let cell = self.dims.check(cell)?;
        self.marked_found.insert(cell);
        Ok(())
    }

    /// True iff `found` is exactly the mine layout: every mine flagged and
    /// nothing else.
    pub fn is_won(&self, found: &HashSet<Cell>) -> bool {
        *found == self.mine_layout
    }

    pub fn won(&self) -> bool {
        self.is_won(&self.marked_found)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "--".repeat(self.dims.width()) + "-";
        for row in 0..self.dims.height() {
            writeln!(f, "{rule}")?;
            for col in 0..self.dims.width() {
                let mark = if self.mine_layout.contains(&Cell::new(row, col)) {
                    'X'
                } else {
                    ' '
                };
                write!(f, "|{mark}")?;
            }
            writeln!(f, "|")?;
        }
        writeln!(f, "{rule}")
    }
}
