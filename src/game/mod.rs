// Game engine modules

pub mod board;
pub mod session;

pub use board::{Board, BoardGenerator, BOARD_SIZE};
pub use session::GameSession;

use crate::{dictionary::WordPool, error::GameResult};

/// Deal a standard board from the pool, consuming its words
pub fn create_board(pool: &mut WordPool) -> GameResult<Board> {
    BoardGenerator::generate(pool)
}

/// Wrap a board in a fresh, not yet started session
pub fn new_session(board: Board) -> GameSession {
    GameSession::new(board)
}
