//! Chat command layer: parses player messages, enforces who may act when,
//! and turns session changes into replies for the chat transport.

pub mod handler;
pub mod messages;

pub use handler::CommandHandler;
pub use messages::{Command, Reply, WinReason, COMMAND_PREFIX};

use thiserror::Error;

use crate::{error::GameError, models::TeamColor};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("no game is running here, type !codenames to start one")]
    NoActiveGame,

    #[error("the game has already started")]
    GameAlreadyRunning,

    #[error("the {0} team needs a spymaster before the game can start")]
    MissingSpymaster(TeamColor),

    #[error("{0} has not joined a team, use !join <red|blue>")]
    NotInGame(String),

    #[error("it's the {0} team's turn")]
    NotYourTurn(TeamColor),

    #[error("only the {0} spymaster can do that")]
    NotSpymaster(TeamColor),

    #[error("spymasters can't guess")]
    SpymasterCannotGuess,

    #[error("only guessers can pass")]
    SpymasterCannotPass,

    #[error("wait for your spymaster's clue")]
    NoClueGiven,

    #[error("a clue has already been given this turn")]
    ClueAlreadyGiven,

    #[error("the clue can't be a word on the board")]
    ClueOnBoard,

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("unknown command !{0}, try !help")]
    UnknownCommand(String),

    #[error(transparent)]
    Game(#[from] GameError),
}
