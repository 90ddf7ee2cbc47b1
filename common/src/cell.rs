use crate::error::{Error, Result};
use itertools::iproduct;
use std::fmt;

/// A (row, column) coordinate on the board.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct Cell {
    /// Zero-based row, counted from the top.
    pub row: usize,
    /// Zero-based column, counted from the left.
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Cell { row, col }
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Self {
        Cell { row, col }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// The shape of a board. Shared by the ground truth and the agent so both
/// agree on what a neighbour is.
///
/// Both sides are positive and their product fits in a `usize`; decoding
/// goes through the same checks as [`Dimensions::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawDimensions")]
pub struct Dimensions {
    height: usize,
    width: usize,
}

/// Unchecked wire form of [`Dimensions`].
#[derive(serde::Deserialize)]
struct RawDimensions {
    height: usize,
    width: usize,
}

impl TryFrom<RawDimensions> for Dimensions {
    type Error = Error;

    fn try_from(raw: RawDimensions) -> Result<Self> {
        Dimensions::new(raw.height, raw.width)
    }
}

impl Dimensions {
    pub fn new(height: usize, width: usize) -> Result<Self> {
        if height == 0 || width == 0 {
            return Err(Error::EmptyBoard { height, width });
        }
        if height.checked_mul(width).is_none() {
            return Err(Error::TooLarge { height, width });
        }
        Ok(Dimensions { height, width })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of cells. Cannot overflow, `new` rejects such shapes.
    pub fn area(&self) -> usize {
        self.height * self.width
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.height && cell.col < self.width
    }

    /// Returns `cell` unchanged, or `OutOfBounds` if it is not on the board.
    pub fn check(&self, cell: Cell) -> Result<Cell> {
        if self.contains(cell) {
            Ok(cell)
        } else {
            Err(Error::OutOfBounds {
                cell,
                height: self.height,
                width: self.width,
            })
        }
    }

    /// Every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + use<> {
        iproduct!(0..self.height, 0..self.width).map(Cell::from)
    }

    /// The 8-connected neighbourhood of `cell`, clipped at edges and corners.
    /// The cell itself is excluded.
    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + use<> {
        let Dimensions { height, width } = *self;
        let rows = cell.row.saturating_sub(1)..cell.row.saturating_add(2).min(height);
        let cols = cell.col.saturating_sub(1)..cell.col.saturating_add(2).min(width);
        iproduct!(rows, cols)
            .map(Cell::from)
            .filter(move |&n| n != cell)
    }

    pub fn neighbor_count(&self, cell: Cell) -> usize {
        self.neighbors(cell).count()
    }
}
