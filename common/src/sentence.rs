use crate::cell::Cell;
use crate::error::{Contradiction, Error, Result};
use itertools::Itertools;
use std::collections::HashSet;
use std::fmt;

/// A logical statement about the board: exactly `count` of `cells` are mines.
///
/// `count <= cells.len()` holds for every value of this type; constructors,
/// mutators and decoding report a [`Contradiction`] instead of breaking it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawSentence")]
pub struct Sentence {
    cells: HashSet<Cell>,
    count: usize,
}

/// Unchecked wire form of [`Sentence`].
#[derive(serde::Deserialize)]
struct RawSentence {
    cells: HashSet<Cell>,
    count: usize,
}

impl TryFrom<RawSentence> for Sentence {
    type Error = Error;

    fn try_from(raw: RawSentence) -> Result<Self> {
        Sentence::new(raw.cells, raw.count)
    }
}

impl Sentence {
    pub fn new(cells: impl IntoIterator<Item = Cell>, count: usize) -> Result<Self> {
        let sentence = Sentence {
            cells: cells.into_iter().collect(),
            count,
        };
        sentence.check()?;
        Ok(sentence)
    }

    fn check(&self) -> Result<()> {
        if self.count > self.cells.len() {
            return Err(Contradiction::Overfull {
                cells: self.cells.len(),
                count: self.count,
            }
            .into());
        }
        Ok(())
    }

    pub fn cells(&self) -> &HashSet<Cell> {
        &self.cells
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, cell: &Cell) -> bool {
        self.cells.contains(cell)
    }

    /// Every cell, when the count leaves no room for a safe one.
    pub fn known_mines(&self) -> HashSet<Cell> {
        if self.count == self.cells.len() {
            self.cells.clone()
        } else {
            HashSet::new()
        }
    }

    /// Every cell, when the count is zero.
    pub fn known_safes(&self) -> HashSet<Cell> {
        if self.count == 0 {
            self.cells.clone()
        } else {
            HashSet::new()
        }
    }

    /// Removes `cell` as a mine, lowering the count with it. Returns whether
    /// the sentence mentioned the cell.
    pub fn mark_mine(&mut self, cell: Cell) -> Result<bool> {
        if !self.cells.contains(&cell) {
            return Ok(false);
        }
        let count = self
            .count
            .checked_sub(1)
            .ok_or(Contradiction::Underflow(cell))?;
        self.cells.remove(&cell);
        self.count = count;
        Ok(true)
    }

    /// Removes `cell` as safe. The count stays, so this fails when the
    /// remaining cells can no longer hold it.
    pub fn mark_safe(&mut self, cell: Cell) -> Result<bool> {
        if !self.cells.remove(&cell) {
            return Ok(false);
        }
        self.check()?;
        Ok(true)
    }

    /// Subset resolution. When `other` covers a strict subset of this
    /// sentence's cells, the cells left over must hold the difference of the
    /// two counts.
    pub fn subtract(&self, other: &Sentence) -> Result<Option<Sentence>> {
        if self.cells == other.cells {
            if self.count != other.count {
                return Err(Contradiction::ConflictingCounts(self.count, other.count).into());
            }
            return Ok(None);
        }
        if !other.cells.is_subset(&self.cells) {
            return Ok(None);
        }
        let count = self
            .count
            .checked_sub(other.count)
            .ok_or(Contradiction::Overfull {
                cells: other.cells.len(),
                count: other.count,
            })?;
        let rest = self.cells.difference(&other.cells).copied();
        Sentence::new(rest, count).map(Some)
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{}}} = {}",
            self.cells.iter().sorted().join(", "),
            self.count
        )
    }
}
