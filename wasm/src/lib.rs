use minesweeper_ai as ms;
use wasm_bindgen::prelude::*;

fn load(bts: &[u8]) -> Result<ms::Game, String> {
    ms::Game::deserialize(bts).map_err(|e| e.to_string())
}

fn store(game: &ms::Game) -> Result<Vec<u8>, String> {
    game.serialize().map_err(|e| e.to_string())
}

#[wasm_bindgen]
pub fn create_game(height: usize, width: usize, mines: usize) -> Result<Vec<u8>, String> {
    console_error_panic_hook::set_once();

    let config = ms::GameConfig::new(height, width, mines);
    let game = ms::Game::new(&config).map_err(|e| e.to_string())?;
    store(&game)
}

#[wasm_bindgen]
pub fn reveal(bts: Vec<u8>, row: usize, col: usize) -> Result<Vec<u8>, String> {
    console_error_panic_hook::set_once();

    let mut game = load(&bts)?;
    game.reveal(ms::Cell::new(row, col))
        .map_err(|e| e.to_string())?;
    store(&game)
}

/// Lets the agent play one move. The returned state is unchanged when it
/// had nothing left to try.
#[wasm_bindgen]
pub fn auto_step(bts: Vec<u8>) -> Result<Vec<u8>, String> {
    console_error_panic_hook::set_once();

    let mut game = load(&bts)?;
    game.step(&mut rand::rng()).map_err(|e| e.to_string())?;
    store(&game)
}

/// 0 playing, 1 won, 2 lost, 3 broken.
#[wasm_bindgen]
pub fn game_state(bts: Vec<u8>) -> Result<u8, String> {
    console_error_panic_hook::set_once();

    let game = load(&bts)?;
    Ok(match game.game_state {
        ms::GameState::Playing => 0,
        ms::GameState::Won => 1,
        ms::GameState::Lost => 2,
        ms::GameState::Broken => 3,
    })
}

/// Row-major cells: the revealed count, -2 for a proven mine, -1 otherwise.
#[wasm_bindgen]
pub fn get_cells(bts: Vec<u8>) -> Result<Vec<i8>, String> {
    console_error_panic_hook::set_once();

    let game = load(&bts)?;
    let mines = game.agent().mines();
    Ok(game
        .board()
        .dimensions()
        .cells()
        .map(|cell| match game.revealed(cell) {
            Some(n) => n as i8,
            None if mines.contains(&cell) => -2,
            None => -1,
        })
        .collect())
}
