use anyhow::Context;
use minesweeper_ai::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn main() -> anyhow::Result<()> {
    // --- 1. Initialization ---
    let config = GameConfig::from_env().context("reading game configuration")?;
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };
    let mut game = Game::with_rng(&config, &mut rng).context("creating game")?;

    println!("--- Knowledge-Base Minesweeper Bot ---");
    println!(
        "Board: {}x{} with {} mines",
        config.height, config.width, config.mines
    );
    println!("Strategy: reveal proven-safe cells, guess randomly otherwise.");

    // --- 2. Game Loop ---
    let mut move_count = 0;
    while let Some(next) = game.step(&mut rng).context("agent move failed")? {
        move_count += 1;
        let agent = game.agent();
        println!(
            "Move #{move_count}: {next} | safes {} mines {} sentences {}",
            agent.safes().len(),
            agent.mines().len(),
            agent.knowledge().len()
        );
    }

    // --- 3. Final Result ---
    println!("\n--- Game Over ---");
    print_board(&game);

    match game.game_state {
        GameState::Won => println!("Result: The bot won!"),
        GameState::Lost => println!("Result: The bot hit a mine and lost."),
        GameState::Playing => println!("Result: The bot ran out of moves."),
        GameState::Broken => println!("Result: The bot's knowledge became inconsistent."),
    }
    Ok(())
}

fn print_board(game: &Game) {
    let board = game.board();
    let agent = game.agent();

    print!("   ");
    for col in 0..board.width() {
        print!("{:^3}", col);
    }
    println!("\n  +{}", "---".repeat(board.width()));

    for row in 0..board.height() {
        print!("{:^2}|", row);
        for col in 0..board.width() {
            let cell = Cell::new(row, col);
            let display = match game.revealed(cell) {
                Some(n) => format!(" {} ", n),
                None if agent.mines().contains(&cell) => " F ".to_string(),
                None if board.mines().contains(&cell) => " * ".to_string(),
                None => " ■ ".to_string(),
            };
            print!("{}", display);
        }
        println!();
    }
    println!();
}
