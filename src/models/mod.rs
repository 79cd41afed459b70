pub mod game;
pub mod team;

pub use game::{Clue, GamePhase, GuessOutcome, TeamColor, WordRole};
pub use team::Team;
