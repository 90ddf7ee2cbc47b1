use crate::cell::{Cell, Dimensions};
use crate::error::{Contradiction, Error, Result};
use crate::oracle::{self, DeducedState};
use crate::sentence::Sentence;
use std::collections::{HashMap, HashSet};

/// Cells newly proven during one call to [`Agent::add_knowledge`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inference {
    /// Cells proven safe by this call, sorted. Includes the revealed cell the
    /// first time it is seen.
    pub safes: Vec<Cell>,
    /// Cells proven to be mines by this call, sorted.
    pub mines: Vec<Cell>,
}

impl Inference {
    pub fn is_empty(&self) -> bool {
        self.safes.is_empty() && self.mines.is_empty()
    }
}

/// The knowledge base that plays the game.
///
/// Every revealed cell becomes a [`Sentence`] over its undetermined
/// neighbours, and every proven cell is broadcast into all live sentences.
/// `safes` and `mines` only grow and never overlap.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawAgent")]
pub struct Agent {
    /// Shape of the board being played.
    dims: Dimensions,
    /// Cells the driver has revealed.
    pub(crate) moves_made: HashSet<Cell>,
    /// Cells proven mine-free.
    pub(crate) safes: HashSet<Cell>,
    /// Cells proven to hold a mine.
    pub(crate) mines: HashSet<Cell>,
    /// Live sentences; none is empty and none mentions a proven cell.
    knowledge: Vec<Sentence>,
}

/// Unchecked wire form of [`Agent`].
#[derive(serde::Deserialize)]
struct RawAgent {
    dims: Dimensions,
    moves_made: HashSet<Cell>,
    safes: HashSet<Cell>,
    mines: HashSet<Cell>,
    knowledge: Vec<Sentence>,
}

impl TryFrom<RawAgent> for Agent {
    type Error = Error;

    fn try_from(raw: RawAgent) -> Result<Self> {
        let sentence_cells = raw.knowledge.iter().flat_map(|s| s.cells());
        for &cell in raw
            .moves_made
            .iter()
            .chain(&raw.safes)
            .chain(&raw.mines)
            .chain(sentence_cells)
        {
            raw.dims.check(cell)?;
        }
        if let Some(&cell) = raw.safes.intersection(&raw.mines).next() {
            return Err(Contradiction::SafeAndMine(cell).into());
        }
        if let Some(&cell) = raw.moves_made.difference(&raw.safes).next() {
            return Err(Contradiction::Unsound(cell).into());
        }
        Ok(Agent {
            dims: raw.dims,
            moves_made: raw.moves_made,
            safes: raw.safes,
            mines: raw.mines,
            knowledge: raw.knowledge,
        })
    }
}

impl Agent {
    pub fn new(height: usize, width: usize) -> Result<Self> {
        Ok(Self::for_dimensions(Dimensions::new(height, width)?))
    }

    pub fn for_dimensions(dims: Dimensions) -> Self {
        Agent {
            dims,
            moves_made: HashSet::new(),
            safes: HashSet::new(),
            mines: HashSet::new(),
            knowledge: Vec::new(),
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    pub fn moves_made(&self) -> &HashSet<Cell> {
        &self.moves_made
    }

    pub fn safes(&self) -> &HashSet<Cell> {
        &self.safes
    }

    pub fn mines(&self) -> &HashSet<Cell> {
        &self.mines
    }

    pub fn knowledge(&self) -> &[Sentence] {
        &self.knowledge
    }

    /// Records that `cell` was revealed with `count` mines around it, then
    /// derives everything that logically follows.
    ///
    /// An `Err` that [`Error::is_internal`] means the reported counts
    /// contradict earlier ones; the agent should be discarded after that.
    pub fn add_knowledge(&mut self, cell: Cell, count: usize) -> Result<Inference> {
        let cell = self.dims.check(cell)?;
        let neighbors = self.dims.neighbor_count(cell);
        if count > neighbors {
            return Err(Error::CountTooLarge {
                cell,
                count,
                neighbors,
            });
        }

        let before = (self.safes.clone(), self.mines.clone());

        self.moves_made.insert(cell);
        self.mark_safe(cell)?;

        let mut remaining = count;
        let mut undetermined = Vec::new();
        for neighbor in self.dims.neighbors(cell) {
            if self.mines.contains(&neighbor) {
                remaining = remaining
                    .checked_sub(1)
                    .ok_or(Contradiction::Underflow(cell))?;
            } else if !self.safes.contains(&neighbor) {
                undetermined.push(neighbor);
            }
        }
        // An empty sentence still has to admit its count.
        let sentence = Sentence::new(undetermined, remaining)?;
        self.learn(sentence);

        self.saturate()?;

        let mut inference = Inference {
            safes: self.safes.difference(&before.0).copied().collect(),
            mines: self.mines.difference(&before.1).copied().collect(),
        };
        inference.safes.sort_unstable();
        inference.mines.sort_unstable();
        Ok(inference)
    }

    /// Broadcasts `cell` as a mine into the global set and every sentence.
    /// Returns whether it was new.
    pub fn mark_mine(&mut self, cell: Cell) -> Result<bool> {
        if self.safes.contains(&cell) {
            return Err(Contradiction::SafeAndMine(cell).into());
        }
        let fresh = self.mines.insert(cell);
        for sentence in &mut self.knowledge {
            sentence.mark_mine(cell)?;
        }
        Ok(fresh)
    }

    /// Broadcasts `cell` as safe into the global set and every sentence.
    /// Returns whether it was new.
    pub fn mark_safe(&mut self, cell: Cell) -> Result<bool> {
        if self.mines.contains(&cell) {
            return Err(Contradiction::SafeAndMine(cell).into());
        }
        let fresh = self.safes.insert(cell);
        for sentence in &mut self.knowledge {
            sentence.mark_safe(cell)?;
        }
        Ok(fresh)
    }

    /// Appends `sentence` unless it is empty or already known.
    fn learn(&mut self, sentence: Sentence) -> bool {
        if sentence.is_empty() || self.knowledge.contains(&sentence) {
            return false;
        }
        self.knowledge.push(sentence);
        true
    }

    /// Runs inference to a fixpoint. Each pass hands the cells that a
    /// sentence pins down to the broadcast marks, drops empty and duplicate
    /// sentences, then adds `superset - subset` for every pair where one
    /// sentence's cells strictly contain another's. A pass either grows
    /// `safes ∪ mines` or adds an unseen sentence, both bounded by the board,
    /// so the loop ends.
    fn saturate(&mut self) -> Result<()> {
        loop {
            let mut changed = false;

            let mut safes = Vec::new();
            let mut mines = Vec::new();
            for sentence in &self.knowledge {
                safes.extend(sentence.known_safes());
                mines.extend(sentence.known_mines());
            }
            for cell in safes {
                changed |= self.mark_safe(cell)?;
            }
            for cell in mines {
                changed |= self.mark_mine(cell)?;
            }

            // Marking can collapse two sentences into the same one.
            let mut live: Vec<Sentence> = Vec::with_capacity(self.knowledge.len());
            for sentence in self.knowledge.drain(..) {
                if !sentence.is_empty() && !live.contains(&sentence) {
                    live.push(sentence);
                }
            }
            self.knowledge = live;

            let mut derived = Vec::new();
            for (i, superset) in self.knowledge.iter().enumerate() {
                for (j, subset) in self.knowledge.iter().enumerate() {
                    if i == j {
                        continue;
                    }
                    if let Some(sentence) = superset.subtract(subset)? {
                        derived.push(sentence);
                    }
                }
            }
            for sentence in derived {
                changed |= self.learn(sentence);
            }

            if !changed {
                return Ok(());
            }
        }
    }

    /// Checks the agent's conclusions against an exhaustive search over
    /// `observations`: every mine it claims must be forced in all consistent
    /// layouts, and likewise every safe cell. Returns the cells that are
    /// forced but which the agent has not (yet) concluded.
    pub fn audit(&self, observations: &[Sentence]) -> Result<HashMap<Cell, DeducedState>> {
        let mut deductions = oracle::deduce(observations)?;
        for &cell in &self.mines {
            if deductions.get(&cell).is_some_and(|&s| s != DeducedState::ForcedMine) {
                return Err(Contradiction::Unsound(cell).into());
            }
        }
        for &cell in &self.safes {
            if deductions.get(&cell).is_some_and(|&s| s != DeducedState::ForcedSafe) {
                return Err(Contradiction::Unsound(cell).into());
            }
        }
        deductions.retain(|cell, state| match state {
            DeducedState::ForcedMine => !self.mines.contains(cell),
            DeducedState::ForcedSafe => !self.safes.contains(cell),
            DeducedState::Undetermined => false,
        });
        Ok(deductions)
    }
}
