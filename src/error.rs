use thiserror::Error;

use crate::models::{GamePhase, TeamColor};

/// Errors raised by board allocation and session mutation.
///
/// `InvalidWord` is deliberately absent: an unknown guess is an ordinary
/// [`GuessOutcome`](crate::models::GuessOutcome), not a failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("word pool has {available} distinct words, a board needs {needed}")]
    InsufficientWords { needed: usize, available: usize },

    #[error("cannot {action} while the game is {phase}")]
    InvalidState {
        action: &'static str,
        phase: GamePhase,
    },

    #[error("word {0} appears more than once on the board")]
    DuplicateWord(String),

    #[error("{0} team has no words")]
    EmptyTeam(TeamColor),

    #[error("a board needs exactly one assassin, got {0}")]
    AssassinCount(usize),

    #[error("{player} already plays for the {team} team")]
    PlayerAlreadyJoined { player: String, team: TeamColor },

    #[error("{player} is already the {team} spymaster")]
    SpymasterTaken { player: String, team: TeamColor },
}

pub type GameResult<T> = std::result::Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = GameError::InsufficientWords {
            needed: 25,
            available: 3,
        };
        assert_eq!(
            err.to_string(),
            "word pool has 3 distinct words, a board needs 25"
        );

        let err = GameError::InvalidState {
            action: "submit a guess",
            phase: GamePhase::NotStarted,
        };
        assert_eq!(
            err.to_string(),
            "cannot submit a guess while the game is not started"
        );
    }
}
