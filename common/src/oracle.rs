use crate::cell::Cell;
use crate::error::{Contradiction, Error, Result};
use crate::sentence::Sentence;
use itertools::Itertools;
use std::collections::HashMap;
use varisat::{CnfFormula, ExtendFormula, Lit, Solver};

/// What every layout consistent with the sentences says about one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeducedState {
    ForcedMine,   // A mine in every consistent layout.
    ForcedSafe,   // Clear in every consistent layout.
    Undetermined, // Consistent layouts disagree.
}

/// Classifies every cell mentioned by `sentences`.
///
/// Each sentence becomes an exactly-k cardinality constraint over one SAT
/// variable per cell, and each cell is then tested both ways under
/// assumptions. This finds every conclusion that follows from the
/// sentences, which the agent's propagation may not, so it backs
/// [`Agent::audit`](crate::Agent::audit) rather than move selection.
pub fn deduce(sentences: &[Sentence]) -> Result<HashMap<Cell, DeducedState>> {
    let mut solver = Solver::new();
    let mut lits: HashMap<Cell, Lit> = HashMap::new();
    for sentence in sentences {
        for &cell in sentence.cells() {
            lits.entry(cell)
                .or_insert_with(|| Lit::from_var(solver.new_var(), true));
        }
    }

    let mut formula = CnfFormula::new();
    for sentence in sentences {
        let vars: Vec<Lit> = sentence.cells().iter().map(|cell| lits[cell]).collect();
        encode_exactly_k(&mut formula, &vars, sentence.count());
    }
    solver.add_formula(&formula);

    if !solve(&mut solver, &[])? {
        return Err(Contradiction::Unsatisfiable.into());
    }

    let mut deductions = HashMap::with_capacity(lits.len());
    for (&cell, &lit) in &lits {
        let mine_possible = solve(&mut solver, &[lit])?;
        let safe_possible = solve(&mut solver, &[!lit])?;
        let state = match (mine_possible, safe_possible) {
            (true, true) => DeducedState::Undetermined,
            (true, false) => DeducedState::ForcedMine,
            (false, true) => DeducedState::ForcedSafe,
            (false, false) => return Err(Contradiction::Unsatisfiable.into()),
        };
        deductions.insert(cell, state);
    }
    Ok(deductions)
}

fn solve(solver: &mut Solver, assumptions: &[Lit]) -> Result<bool> {
    solver.assume(assumptions);
    let result = solver.solve().map_err(solver_error)?;
    solver.assume(&[]);
    Ok(result)
}

fn solver_error(e: varisat::solver::SolverError) -> Error {
    Error::Solver(e.to_string())
}

/// Sentences never span more than a cell's eight neighbours, so the naive
/// combinations encoding stays small.
fn encode_exactly_k(formula: &mut CnfFormula, vars: &[Lit], k: usize) {
    let n = vars.len();
    if k > n {
        formula.add_clause(&[]);
        return;
    }
    // At most k: no k+1 of them are all mines.
    if k < n {
        for combo in vars.iter().copied().combinations(k + 1) {
            let clause: Vec<Lit> = combo.into_iter().map(|lit| !lit).collect();
            formula.add_clause(&clause);
        }
    }
    // At least k: no n-k+1 of them are all safe.
    if k > 0 {
        for combo in vars.iter().copied().combinations(n - k + 1) {
            formula.add_clause(&combo);
        }
    }
}
