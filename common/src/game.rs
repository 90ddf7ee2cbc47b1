use crate::agent::{Agent, Inference};
use crate::board::Board;
use crate::cell::Cell;
use crate::config::GameConfig;
use crate::error::{Error, Result};
use crate::moves::Move;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

/// Tracks the current status of the game (playing, won, lost, broken).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum GameState {
    Playing,
    Won,
    Lost,
    Broken, // The agent's knowledge contradicted itself; no further play.
}

/// One session: the hidden board, the agent's knowledge about it, and the
/// counts revealed so far.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawGame")]
pub struct Game {
    /// The hidden layout, plus the mines flagged so far.
    board: Board,
    /// Everything proven from the reveals.
    agent: Agent,
    /// Neighbour count shown on each revealed cell.
    revealed: HashMap<Cell, u8>,
    /// Tracks the current status of the game.
    pub game_state: GameState,
}

/// Unchecked wire form of [`Game`].
#[derive(serde::Deserialize)]
struct RawGame {
    board: Board,
    agent: Agent,
    revealed: HashMap<Cell, u8>,
    game_state: GameState,
}

impl TryFrom<RawGame> for Game {
    type Error = Error;

    fn try_from(raw: RawGame) -> Result<Self> {
        if raw.board.dimensions() != raw.agent.dimensions() {
            return Err(Error::Codec("board and agent disagree on the board shape".into()));
        }
        for &cell in raw.revealed.keys() {
            if raw.board.is_mine(cell)? {
                return Err(Error::Codec(format!("revealed cell {cell} is a mine")));
            }
        }
        Ok(Game {
            board: raw.board,
            agent: raw.agent,
            revealed: raw.revealed,
            game_state: raw.game_state,
        })
    }
}

impl Game {
    pub fn new(config: &GameConfig) -> Result<Self> {
        match config.seed {
            Some(seed) => Self::with_rng(config, &mut StdRng::seed_from_u64(seed)),
            None => Self::with_rng(config, &mut rand::rng()),
        }
    }

    pub fn with_rng<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> Result<Self> {
        config.validate()?;
        let board = Board::with_rng(config.height, config.width, config.mines, rng)?;
        Ok(Self::from_board(board))
    }

    pub fn from_board(board: Board) -> Self {
        Game {
            agent: Agent::for_dimensions(board.dimensions()),
            board,
            revealed: HashMap::new(),
            game_state: GameState::Playing,
        }
    }

    pub fn deserialize(bts: &[u8]) -> Result<Self> {
        Ok(bcs::from_bytes(bts)?)
    }

    pub fn serialize(&self) -> Result<Vec<u8>> {
        Ok(bcs::to_bytes(self)?)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    /// The neighbour count shown on `cell`, if it has been revealed.
    pub fn revealed(&self, cell: Cell) -> Option<u8> {
        self.revealed.get(&cell).copied()
    }

    /// Reveals `cell`, hands its count to the agent and flags every mine the
    /// agent proves as a result.
    pub fn reveal(&mut self, cell: Cell) -> Result<Inference> {
        if self.game_state != GameState::Playing {
            return Err(Error::GameOver);
        }
        if self.revealed.contains_key(&cell) {
            return Ok(Inference::default());
        }
        if self.board.is_mine(cell)? {
            self.game_state = GameState::Lost;
            return Ok(Inference::default());
        }

        let count = self.board.neighbor_mine_count(cell)?;
        let inference = match self.agent.add_knowledge(cell, count) {
            Ok(inference) => inference,
            Err(e) => {
                if e.is_internal() {
                    self.game_state = GameState::Broken;
                }
                return Err(e);
            }
        };
        // At most eight neighbours.
        self.revealed.insert(cell, count as u8);
        for &mine in &inference.mines {
            self.board.mark_found(mine)?;
        }

        if self.check_win_condition() {
            self.game_state = GameState::Won;
        }
        Ok(inference)
    }

    /// Won once every mine is flagged, or once every clear cell is revealed
    /// so only mines remain hidden.
    pub fn check_win_condition(&self) -> bool {
        let clear = self.board.dimensions().area() - self.board.mine_count();
        self.board.won() || self.revealed.len() == clear
    }

    /// Lets the agent pick and reveal one cell. `None` when the game is over
    /// or there is nothing left to try.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Option<Move>> {
        if self.game_state != GameState::Playing {
            return Ok(None);
        }
        let Some(next) = self.agent.next_move(rng) else {
            return Ok(None);
        };
        self.reveal(next.cell())?;
        Ok(Some(next))
    }

    /// Plays until the game ends or the agent runs out of moves.
    pub fn play<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<GameState> {
        while self.step(rng)?.is_some() {}
        Ok(self.game_state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    #[test]
    fn test_game_initialization() {
        let game = Game::new(&GameConfig::new(5, 4, 3).with_seed(3)).unwrap();
        assert_eq!(game.board().height(), 5);
        assert_eq!(game.board().width(), 4);
        assert_eq!(game.board().mine_count(), 3);
        assert_eq!(game.game_state, GameState::Playing);
        assert!(game.agent().moves_made().is_empty());
    }

    #[test]
    fn test_seed_reproduces_layout() {
        let config = GameConfig::new(6, 6, 7).with_seed(11);
        let a = Game::new(&config).unwrap();
        let b = Game::new(&config).unwrap();
        assert_eq!(a.board().mines(), b.board().mines());
    }

    #[test]
    fn test_game_initialization_too_many_mines() {
        assert!(matches!(
            Game::new(&GameConfig::new(3, 3, 10)),
            Err(Error::TooManyMines { .. })
        ));
    }

    #[test]
    fn test_hitting_mine() {
        let board = Board::from_mines(3, 3, [Cell::new(1, 1)]).unwrap();
        let mut game = Game::from_board(board);

        game.reveal(Cell::new(1, 1)).unwrap();
        assert_eq!(game.game_state, GameState::Lost);
        assert_eq!(game.reveal(Cell::new(0, 0)), Err(Error::GameOver));
    }

    #[test]
    fn test_reveal_flags_proven_mines() {
        //   . . .
        //   . . .
        //   . . X
        let board = Board::from_mines(3, 3, [Cell::new(2, 2)]).unwrap();
        let mut game = Game::from_board(board);

        game.reveal(Cell::new(0, 0)).unwrap();
        assert_eq!(game.revealed(Cell::new(0, 0)), Some(0));
        assert_eq!(game.game_state, GameState::Playing);

        game.reveal(Cell::new(1, 1)).unwrap();
        game.reveal(Cell::new(1, 2)).unwrap();
        let inference = game.reveal(Cell::new(2, 1)).unwrap();

        assert_eq!(inference.mines, vec![Cell::new(2, 2)]);
        assert_eq!(game.board().marked_found(), &HashSet::from([Cell::new(2, 2)]));
        assert_eq!(game.game_state, GameState::Won);
    }

    #[test]
    fn test_contradiction_ends_the_session() {
        let board = Board::from_mines(3, 3, [Cell::new(2, 2)]).unwrap();
        let mut game = Game::from_board(board);
        // A false fact the board will contradict.
        game.agent.mark_mine(Cell::new(0, 1)).unwrap();

        let err = game.reveal(Cell::new(0, 0)).unwrap_err();
        assert!(err.is_internal());
        assert_eq!(game.game_state, GameState::Broken);
        assert_eq!(game.revealed(Cell::new(0, 0)), None);

        // Retrying surfaces an error instead of a quiet success.
        assert_eq!(game.reveal(Cell::new(0, 0)), Err(Error::GameOver));
        assert_eq!(game.step(&mut StdRng::seed_from_u64(0)).unwrap(), None);
    }

    #[test]
    fn test_decoding_checks_session() {
        let board = Board::from_mines(3, 3, [Cell::new(2, 2)]).unwrap();
        let mut game = Game::from_board(board);
        game.revealed.insert(Cell::new(2, 2), 0);
        let bytes = game.serialize().unwrap();
        assert!(matches!(Game::deserialize(&bytes), Err(Error::Codec(_))));

        let mut game = Game::from_board(Board::from_mines(3, 3, []).unwrap());
        game.agent = Agent::new(4, 4).unwrap();
        let bytes = game.serialize().unwrap();
        assert!(matches!(Game::deserialize(&bytes), Err(Error::Codec(_))));
    }

    #[test]
    fn test_reveal_twice_is_noop() {
        let board = Board::from_mines(3, 3, [Cell::new(2, 2)]).unwrap();
        let mut game = Game::from_board(board);
        game.reveal(Cell::new(0, 1)).unwrap();
        let agent = game.agent().clone();

        assert!(game.reveal(Cell::new(0, 1)).unwrap().is_empty());
        assert_eq!(game.agent(), &agent);
    }

    #[test]
    fn test_autonomous_play_finishes() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..10 {
            let mut game = Game::with_rng(&GameConfig::new(8, 8, 8), &mut rng).unwrap();
            let state = game.play(&mut rng).unwrap();
            assert_ne!(state, GameState::Playing);

            // Whatever happened, every flag the agent raised was a real mine.
            let agent_mines = game.agent().mines();
            assert!(agent_mines.is_subset(game.board().mines()));
            assert!(agent_mines.is_disjoint(game.agent().safes()));
            assert!(
                game.agent()
                    .safes()
                    .iter()
                    .all(|cell| !game.board().mines().contains(cell))
            );
        }
    }

    #[test]
    fn test_serialization_round_trip() {
        let board = Board::from_mines(4, 4, [Cell::new(3, 3), Cell::new(0, 3)]).unwrap();
        let mut game = Game::from_board(board);
        game.reveal(Cell::new(0, 0)).unwrap();

        let restored = Game::deserialize(&game.serialize().unwrap()).unwrap();
        assert_eq!(restored.agent(), game.agent());
        assert_eq!(restored.board(), game.board());
        assert_eq!(restored.revealed(Cell::new(0, 0)), Some(0));
        assert_eq!(restored.game_state, GameState::Playing);

        assert!(matches!(Game::deserialize(&[1, 2, 3]), Err(Error::Codec(_))));
    }
}
