use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the two teams. Red plays the part of team A, blue of team B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamColor {
    Red,
    Blue,
}

impl TeamColor {
    pub const ALL: [TeamColor; 2] = [TeamColor::Red, TeamColor::Blue];

    /// The opposing team
    pub fn other(self) -> Self {
        match self {
            TeamColor::Red => TeamColor::Blue,
            TeamColor::Blue => TeamColor::Red,
        }
    }
}

impl fmt::Display for TeamColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeamColor::Red => write!(f, "red"),
            TeamColor::Blue => write!(f, "blue"),
        }
    }
}

impl FromStr for TeamColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "red" | "r" => Ok(TeamColor::Red),
            "blue" | "b" => Ok(TeamColor::Blue),
            other => Err(format!("unknown team '{}', expected red or blue", other)),
        }
    }
}

/// Hidden role of a board word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordRole {
    Red,
    Blue,
    Bystander,
    Assassin,
}

impl WordRole {
    /// The team owning this word, if any
    pub fn team(self) -> Option<TeamColor> {
        match self {
            WordRole::Red => Some(TeamColor::Red),
            WordRole::Blue => Some(TeamColor::Blue),
            WordRole::Bystander | WordRole::Assassin => None,
        }
    }
}

impl From<TeamColor> for WordRole {
    fn from(color: TeamColor) -> Self {
        match color {
            TeamColor::Red => WordRole::Red,
            TeamColor::Blue => WordRole::Blue,
        }
    }
}

/// Lifecycle of a session. Only `InProgress` accepts guesses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "winner", rename_all = "snake_case")]
pub enum GamePhase {
    NotStarted,
    InProgress,
    Finished(TeamColor),
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GamePhase::NotStarted => write!(f, "not started"),
            GamePhase::InProgress => write!(f, "in progress"),
            GamePhase::Finished(winner) => write!(f, "finished ({} won)", winner),
        }
    }
}

/// Result of resolving a single guess
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuessOutcome {
    /// The word is not on this board
    InvalidWord,
    /// The word was revealed earlier; nothing changed
    AlreadyGuessed,
    /// The guessing team hit the assassin and lost
    Assassin,
    Bystander,
    /// The word belonged to the opposing team
    WrongTeam,
    Correct,
}

impl GuessOutcome {
    /// Whether the guess revealed a word
    pub fn revealed(self) -> bool {
        !matches!(self, GuessOutcome::InvalidWord | GuessOutcome::AlreadyGuessed)
    }
}

/// A spymaster clue: one word plus how many board words it points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clue {
    pub word: String,
    pub count: u32,
}

impl fmt::Display for Clue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.word, self.count)
    }
}
