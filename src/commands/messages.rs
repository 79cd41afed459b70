use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    commands::CommandError,
    models::{GuessOutcome, TeamColor},
    view::Viewer,
};

/// Prefix marking a chat message as a command
pub const COMMAND_PREFIX: char = '!';

pub const HELP_TEXT: &str = "\
!codenames              deal a new game in this channel
!join <red|blue>        join a team as a guesser
!spymaster <red|blue>   become a team's spymaster
!start                  start play once both teams have a spymaster
!clue <word> <count>    give your team a clue (spymaster, your turn)
!guess <word>           guess a word (guesser, your turn)
!pass                   end your team's turn
!board                  show the board
!words                  list your team's unrevealed words (spymaster)
!end                    abandon the game";

/// Commands a player can send in chat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    NewGame,
    Join { team: TeamColor },
    Spymaster { team: TeamColor },
    Start,
    Clue { word: String, count: u32 },
    Guess { word: String },
    Pass,
    Board,
    Words,
    End,
    Help,
}

impl Command {
    /// Parse a chat message.
    ///
    /// Returns `None` for ordinary chatter that is not addressed to the bot.
    pub fn parse(message: &str) -> Option<Result<Self, CommandError>> {
        let body = message.trim().strip_prefix(COMMAND_PREFIX)?;
        let (name, args) = match body.split_once(char::is_whitespace) {
            Some((name, args)) => (name, args.trim()),
            None => (body, ""),
        };
        Some(Self::from_parts(&name.to_lowercase(), args))
    }

    fn from_parts(name: &str, args: &str) -> Result<Self, CommandError> {
        match name {
            "codenames" => Ok(Command::NewGame),
            "join" => Ok(Command::Join {
                team: parse_team(args, "!join <red|blue>")?,
            }),
            "spymaster" => Ok(Command::Spymaster {
                team: parse_team(args, "!spymaster <red|blue>")?,
            }),
            "start" => Ok(Command::Start),
            "clue" => {
                let usage = || CommandError::Usage("!clue <word> <count>");
                let (word, count) = args.rsplit_once(char::is_whitespace).ok_or_else(usage)?;
                let count = count.parse().map_err(|_| usage())?;
                let word = word.trim();
                if word.is_empty() {
                    return Err(usage());
                }
                Ok(Command::Clue {
                    word: word.to_string(),
                    count,
                })
            }
            "guess" if !args.is_empty() => Ok(Command::Guess {
                word: args.to_string(),
            }),
            "guess" => Err(CommandError::Usage("!guess <word>")),
            "pass" => Ok(Command::Pass),
            "board" => Ok(Command::Board),
            "words" => Ok(Command::Words),
            "end" => Ok(Command::End),
            "help" => Ok(Command::Help),
            other => Err(CommandError::UnknownCommand(other.to_string())),
        }
    }
}

fn parse_team(args: &str, usage: &'static str) -> Result<TeamColor, CommandError> {
    args.parse().map_err(|_| CommandError::Usage(usage))
}

/// Why a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinReason {
    AllWordsFound,
    Assassin,
}

/// Messages sent back to the chat
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Reply {
    GameCreated {
        game_id: Uuid,
        starting_team: TeamColor,
    },
    PlayerJoined {
        player: String,
        team: TeamColor,
        spymaster: bool,
    },
    GameStarted {
        turn: TeamColor,
    },
    ClueGiven {
        team: TeamColor,
        clue: String,
        count: u32,
        guesses: u32,
    },
    GuessResolved {
        player: String,
        team: TeamColor,
        word: String,
        outcome: GuessOutcome,
        guesses_remaining: u32,
    },
    TurnChanged {
        team: TeamColor,
    },
    GameOver {
        winner: TeamColor,
        reason: WinReason,
    },
    GameEnded {
        game_id: Uuid,
    },
    /// Spymaster boards are private to `player`
    Board {
        player: String,
        viewer: Viewer,
        text: String,
    },
    /// Spymaster-only; transports should deliver it privately
    SpymasterWords {
        player: String,
        team: TeamColor,
        words: Vec<String>,
    },
    Help {
        text: String,
    },
    Error {
        message: String,
    },
}

impl Reply {
    /// Player this reply must be delivered to privately, if any
    pub fn private_to(&self) -> Option<&str> {
        match self {
            Reply::SpymasterWords { player, .. } => Some(player),
            Reply::Board {
                player,
                viewer: Viewer::Spymaster,
                ..
            } => Some(player),
            _ => None,
        }
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::GameCreated { starting_team, .. } => write!(
                f,
                "New game dealt! The {} team goes first. Pick sides with !join or !spymaster.",
                starting_team
            ),
            Reply::PlayerJoined {
                player,
                team,
                spymaster,
            } => {
                let role = if *spymaster { "spymaster" } else { "guesser" };
                write!(f, "{} joined the {} team as {}.", player, team, role)
            }
            Reply::GameStarted { turn } => {
                write!(f, "Game on! The {} spymaster gives the first clue.", turn)
            }
            Reply::ClueGiven {
                team,
                clue,
                count,
                guesses,
            } => write!(
                f,
                "{} clue: {} {} ({} guesses)",
                team, clue, count, guesses
            ),
            Reply::GuessResolved {
                player,
                word,
                outcome,
                guesses_remaining,
                ..
            } => {
                let verdict = match outcome {
                    GuessOutcome::InvalidWord => "is not in this game, try again.",
                    GuessOutcome::AlreadyGuessed => "was already guessed.",
                    GuessOutcome::Assassin => "was the assassin!",
                    GuessOutcome::Bystander => "was a bystander!",
                    GuessOutcome::WrongTeam => "was the other team's word!",
                    GuessOutcome::Correct => "is correct!",
                };
                write!(f, "{} guessed {}: {}", player, word, verdict)?;
                if *outcome == GuessOutcome::Correct && *guesses_remaining > 0 {
                    write!(f, " {} guesses left.", guesses_remaining)?;
                }
                Ok(())
            }
            Reply::TurnChanged { team } => write!(f, "It's the {} team's turn.", team),
            Reply::GameOver { winner, reason } => match reason {
                WinReason::AllWordsFound => write!(
                    f,
                    "The {} team found all their words and wins! Type !codenames to start a new game.",
                    winner
                ),
                WinReason::Assassin => write!(
                    f,
                    "The {} team lost to the assassin, {} wins! Type !codenames to start a new game.",
                    winner.other(),
                    winner
                ),
            },
            Reply::GameEnded { .. } => write!(f, "Game ended."),
            Reply::Board { text, .. } => write!(f, "{}", text),
            Reply::SpymasterWords { team, words, .. } => {
                write!(f, "{} words left: {}", team, words.join(", "))
            }
            Reply::Help { text } => write!(f, "{}", text),
            Reply::Error { message } => write!(f, "Error: {}", message),
        }
    }
}
