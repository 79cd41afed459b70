//! Rules engine for a two-team Codenames-style word game.
//!
//! The core lives in [`game`]: [`game::BoardGenerator`] deals a board from a
//! [`dictionary::WordPool`], and [`game::GameSession`] resolves guesses,
//! swaps turns and detects the winner. [`commands`] and [`lobby`] sit on top
//! as the chat-facing layer; [`view`] renders boards for either kind of
//! viewer.

pub mod commands;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod game;
pub mod lobby;
pub mod models;
pub mod view;

pub use dictionary::WordPool;
pub use error::{GameError, GameResult};
pub use game::{create_board, new_session, Board, BoardGenerator, GameSession};
pub use lobby::Lobbies;
pub use models::{Clue, GamePhase, GuessOutcome, Team, TeamColor, WordRole};
