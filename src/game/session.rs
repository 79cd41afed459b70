use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    dictionary::normalize_word,
    error::{GameError, GameResult},
    game::board::Board,
    models::{Clue, GamePhase, GuessOutcome, Team, TeamColor, WordRole},
};

/// State of one game from deal to win.
///
/// The session trusts its caller on turn order: `submit_guess` resolves a
/// guess for whichever team is named, and gating who may guess is left to
/// the command layer. Win detection happens inside `submit_guess`, so the
/// phase is always current after a guess returns.
///
/// Mutations are not synchronised; callers must serialise them per session.
#[derive(Debug, Clone, Serialize)]
pub struct GameSession {
    id: Uuid,
    created_at: DateTime<Utc>,
    board: Board,
    red: Team,
    blue: Team,
    bystanders: Vec<String>,
    guessed: Vec<String>,
    turn: TeamColor,
    clue: Option<Clue>,
    guesses_remaining: u32,
    phase: GamePhase,
}

impl GameSession {
    /// Wrap a freshly dealt board. The session starts in `NotStarted`.
    pub fn new(board: Board) -> Self {
        let red = Team::new(TeamColor::Red, board.words_with_role(WordRole::Red));
        let blue = Team::new(TeamColor::Blue, board.words_with_role(WordRole::Blue));
        let bystanders = board.words_with_role(WordRole::Bystander);
        let turn = board.starting_team();

        let session = Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            board,
            red,
            blue,
            bystanders,
            guessed: Vec::new(),
            turn,
            clue: None,
            guesses_remaining: 0,
            phase: GamePhase::NotStarted,
        };

        tracing::info!(game_id = %session.id, starting_team = %turn, "Created game session");

        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_started(&self) -> bool {
        self.phase != GamePhase::NotStarted
    }

    /// Winner recorded by the phase, including assassin losses
    pub fn winner(&self) -> Option<TeamColor> {
        match self.phase {
            GamePhase::Finished(winner) => Some(winner),
            _ => None,
        }
    }

    fn require_in_progress(&self, action: &'static str) -> GameResult<()> {
        match self.phase {
            GamePhase::InProgress => Ok(()),
            phase => Err(GameError::InvalidState { action, phase }),
        }
    }

    fn require_not_finished(&self, action: &'static str) -> GameResult<()> {
        match self.phase {
            GamePhase::Finished(_) => Err(GameError::InvalidState {
                action,
                phase: self.phase,
            }),
            _ => Ok(()),
        }
    }

    /// Move from `NotStarted` to `InProgress`
    pub fn start(&mut self) -> GameResult<()> {
        if self.phase != GamePhase::NotStarted {
            return Err(GameError::InvalidState {
                action: "start the game",
                phase: self.phase,
            });
        }
        self.phase = GamePhase::InProgress;
        tracing::info!(game_id = %self.id, turn = %self.turn, "Game started");
        Ok(())
    }

    pub fn team(&self, color: TeamColor) -> &Team {
        match color {
            TeamColor::Red => &self.red,
            TeamColor::Blue => &self.blue,
        }
    }

    fn team_mut(&mut self, color: TeamColor) -> &mut Team {
        match color {
            TeamColor::Red => &mut self.red,
            TeamColor::Blue => &mut self.blue,
        }
    }

    /// Spymaster view: the team's words nobody has guessed yet
    pub fn remaining_words(&self, color: TeamColor) -> &[String] {
        self.team(color).unrevealed()
    }

    /// Bystanders not yet revealed
    pub fn remaining_bystanders(&self) -> &[String] {
        &self.bystanders
    }

    /// Revealed words in reveal order
    pub fn guessed(&self) -> &[String] {
        &self.guessed
    }

    pub fn is_guessed(&self, word: &str) -> bool {
        let word = normalize_word(word);
        self.guessed.contains(&word)
    }

    pub fn role_of(&self, word: &str) -> Option<WordRole> {
        self.board.role_of(&normalize_word(word))
    }

    /// Resolve a guess by `team`.
    ///
    /// Checks, in order: board membership, earlier reveal, assassin,
    /// bystander, opposing team, own team. Only the own-team case keeps the
    /// turn. A guess that empties a team's unrevealed set ends the game in
    /// that team's favour.
    pub fn submit_guess(&mut self, word: &str, team: TeamColor) -> GameResult<GuessOutcome> {
        self.require_in_progress("submit a guess")?;

        let word = normalize_word(word);
        let Some(role) = self.board.role_of(&word) else {
            return Ok(GuessOutcome::InvalidWord);
        };
        if self.guessed.contains(&word) {
            return Ok(GuessOutcome::AlreadyGuessed);
        }

        let outcome = match role {
            WordRole::Assassin => {
                self.guessed.push(word.clone());
                self.finish(team.other());
                GuessOutcome::Assassin
            }
            WordRole::Bystander => {
                self.guessed.push(word.clone());
                self.bystanders.retain(|w| *w != word);
                self.turn = team.other();
                GuessOutcome::Bystander
            }
            _ if self.team(team.other()).has_unrevealed(&word) => {
                self.guessed.push(word.clone());
                self.team_mut(team.other()).reveal(&word);
                self.turn = team.other();
                GuessOutcome::WrongTeam
            }
            _ => {
                self.guessed.push(word.clone());
                self.team_mut(team).reveal(&word);
                GuessOutcome::Correct
            }
        };

        tracing::debug!(
            game_id = %self.id,
            word = %word,
            team = %team,
            ?outcome,
            "Resolved guess"
        );

        if self.phase == GamePhase::InProgress {
            if let Some(winner) = self.is_game_over() {
                self.finish(winner);
            }
        }

        Ok(outcome)
    }

    fn finish(&mut self, winner: TeamColor) {
        self.phase = GamePhase::Finished(winner);
        self.clue = None;
        self.guesses_remaining = 0;
        tracing::info!(game_id = %self.id, winner = %winner, "Game finished");
    }

    /// The team whose words are all revealed, if any. Pure.
    pub fn is_game_over(&self) -> Option<TeamColor> {
        TeamColor::ALL
            .into_iter()
            .find(|color| self.team(*color).is_depleted())
    }

    pub fn turn(&self) -> TeamColor {
        self.turn
    }

    pub fn set_turn(&mut self, team: TeamColor) -> GameResult<()> {
        self.require_in_progress("set the turn")?;
        self.turn = team;
        Ok(())
    }

    /// Hand the turn to the other team
    pub fn swap_turn(&mut self) -> GameResult<TeamColor> {
        self.require_in_progress("swap turns")?;
        self.turn = self.turn.other();
        Ok(self.turn)
    }

    pub fn clue(&self) -> Option<&Clue> {
        self.clue.as_ref()
    }

    /// Set the active clue and record it in the current team's history
    pub fn set_clue(&mut self, clue: Clue) -> GameResult<()> {
        self.require_in_progress("set a clue")?;
        let turn = self.turn;
        self.team_mut(turn).push_clue(clue.clone());
        self.clue = Some(clue);
        Ok(())
    }

    pub fn clear_clue(&mut self) -> GameResult<()> {
        self.require_in_progress("clear the clue")?;
        self.clue = None;
        Ok(())
    }

    pub fn guesses_remaining(&self) -> u32 {
        self.guesses_remaining
    }

    pub fn set_guesses_remaining(&mut self, guesses: u32) -> GameResult<()> {
        self.require_in_progress("set remaining guesses")?;
        self.guesses_remaining = guesses;
        Ok(())
    }

    /// Team the player has joined, if any
    pub fn team_of(&self, player: &str) -> Option<TeamColor> {
        TeamColor::ALL
            .into_iter()
            .find(|color| self.team(*color).has_player(player))
    }

    pub fn is_spymaster(&self, player: &str) -> bool {
        TeamColor::ALL
            .into_iter()
            .any(|color| self.team(color).spymaster() == Some(player))
    }

    /// Put a player on a team. Rejoining the same team is a no-op.
    pub fn add_player(&mut self, player: &str, team: TeamColor) -> GameResult<()> {
        self.require_not_finished("join a team")?;
        match self.team_of(player) {
            Some(current) if current != team => Err(GameError::PlayerAlreadyJoined {
                player: player.to_string(),
                team: current,
            }),
            _ => {
                self.team_mut(team).add_player(player.to_string());
                Ok(())
            }
        }
    }

    /// Make a player the team's spymaster, joining them to it if needed
    pub fn set_spymaster(&mut self, player: &str, team: TeamColor) -> GameResult<()> {
        self.require_not_finished("assign a spymaster")?;
        if let Some(current) = self.team(team).spymaster() {
            if current != player {
                return Err(GameError::SpymasterTaken {
                    player: current.to_string(),
                    team,
                });
            }
        }
        self.add_player(player, team)?;
        self.team_mut(team).set_spymaster(player.to_string());
        Ok(())
    }
}
