use std::sync::Arc;

use crate::{
    commands::{
        messages::{Command, Reply, WinReason, HELP_TEXT},
        CommandError,
    },
    dictionary::normalize_word,
    error::GameError,
    game::{GameSession, BOARD_SIZE},
    lobby::Lobbies,
    models::{Clue, GamePhase, GuessOutcome, TeamColor},
    view::{BoardView, Viewer},
};

type CommandResult<T> = Result<T, CommandError>;

/// Applies chat commands to the games held in [`Lobbies`].
///
/// The session trusts whoever calls it, so every turn and role check
/// lives here.
#[derive(Clone)]
pub struct CommandHandler {
    lobbies: Arc<Lobbies>,
}

impl CommandHandler {
    pub fn new(lobbies: Arc<Lobbies>) -> Self {
        Self { lobbies }
    }

    pub fn lobbies(&self) -> &Lobbies {
        &self.lobbies
    }

    /// Handle a raw chat message. Non-commands produce no replies and
    /// failures come back as a single `Error` reply.
    pub fn handle_message(&self, channel_id: &str, player: &str, message: &str) -> Vec<Reply> {
        let Some(parsed) = Command::parse(message) else {
            return Vec::new();
        };

        match parsed.and_then(|command| self.handle_command(channel_id, player, command)) {
            Ok(replies) => replies,
            Err(e) => {
                tracing::warn!(channel_id, player, error = %e, "Rejected command");
                vec![Reply::Error {
                    message: e.to_string(),
                }]
            }
        }
    }

    pub fn handle_command(
        &self,
        channel_id: &str,
        player: &str,
        command: Command,
    ) -> CommandResult<Vec<Reply>> {
        tracing::debug!(channel_id, player, ?command, "Handling command");

        match command {
            Command::NewGame => self.new_game(channel_id, player),
            Command::Join { team } => self.with_game(channel_id, |game| {
                game.add_player(player, team)?;
                Ok(vec![Reply::PlayerJoined {
                    player: player.to_string(),
                    team,
                    spymaster: false,
                }])
            }),
            Command::Spymaster { team } => self.with_game(channel_id, |game| {
                game.set_spymaster(player, team)?;
                Ok(vec![Reply::PlayerJoined {
                    player: player.to_string(),
                    team,
                    spymaster: true,
                }])
            }),
            Command::Start => self.with_game(channel_id, |game| start(game, player)),
            Command::Clue { word, count } => {
                self.with_game(channel_id, |game| give_clue(game, player, &word, count))
            }
            Command::Guess { word } => self.guess(channel_id, player, &word),
            Command::Pass => self.with_game(channel_id, |game| pass(game, player)),
            Command::Board => {
                self.with_game(channel_id, |game| Ok(vec![board_reply(game, player)]))
            }
            Command::Words => self.with_game(channel_id, |game| spymaster_words(game, player)),
            Command::End => {
                let game = self
                    .lobbies
                    .end_game(channel_id)
                    .ok_or(CommandError::NoActiveGame)?;
                Ok(vec![Reply::GameEnded { game_id: game.id() }])
            }
            Command::Help => Ok(vec![Reply::Help {
                text: HELP_TEXT.to_string(),
            }]),
        }
    }

    fn with_game<R>(
        &self,
        channel_id: &str,
        f: impl FnOnce(&mut GameSession) -> CommandResult<R>,
    ) -> CommandResult<R> {
        self.lobbies
            .with_game(channel_id, f)
            .ok_or(CommandError::NoActiveGame)?
    }

    fn new_game(&self, channel_id: &str, player: &str) -> CommandResult<Vec<Reply>> {
        let replies = self.lobbies.new_game_with(channel_id, |game| {
            tracing::info!(channel_id, player, game_id = %game.id(), "Dealt game");
            vec![
                Reply::GameCreated {
                    game_id: game.id(),
                    starting_team: game.board().starting_team(),
                },
                board_reply(game, player),
            ]
        })?;
        Ok(replies)
    }

    fn guess(&self, channel_id: &str, player: &str, word: &str) -> CommandResult<Vec<Reply>> {
        let (replies, finished) = self.with_game(channel_id, |game| {
            let game_id = game.id();
            let team = require_member(game, player)?;
            if game.is_spymaster(player) {
                return Err(CommandError::SpymasterCannotGuess);
            }
            require_turn(game, team)?;
            if game.guesses_remaining() == 0 {
                return Err(CommandError::NoClueGiven);
            }

            let outcome = game.submit_guess(word, team)?;
            if outcome == GuessOutcome::Correct && game.winner().is_none() {
                game.set_guesses_remaining(game.guesses_remaining() - 1)?;
            }

            let mut replies = vec![Reply::GuessResolved {
                player: player.to_string(),
                team,
                word: normalize_word(word),
                outcome,
                guesses_remaining: game.guesses_remaining(),
            }];

            if let Some(winner) = game.winner() {
                let reason = match outcome {
                    GuessOutcome::Assassin => WinReason::Assassin,
                    _ => WinReason::AllWordsFound,
                };
                replies.push(Reply::GameOver { winner, reason });
                return Ok((replies, Some(game_id)));
            }

            let turn_over = match outcome {
                GuessOutcome::Bystander | GuessOutcome::WrongTeam => true,
                GuessOutcome::Correct if game.guesses_remaining() == 0 => {
                    game.swap_turn()?;
                    true
                }
                _ => false,
            };
            if turn_over {
                close_turn(game)?;
                replies.push(Reply::TurnChanged { team: game.turn() });
            }

            Ok((replies, None))
        })?;

        // The entry guard is gone by now, so only remove the game that ended
        if let Some(game_id) = finished {
            self.lobbies.end_game_if(channel_id, game_id);
        }

        Ok(replies)
    }
}

fn require_member(game: &GameSession, player: &str) -> CommandResult<TeamColor> {
    game.team_of(player)
        .ok_or_else(|| CommandError::NotInGame(player.to_string()))
}

fn require_turn(game: &GameSession, team: TeamColor) -> CommandResult<()> {
    if game.phase() != GamePhase::InProgress {
        return Err(GameError::InvalidState {
            action: "play",
            phase: game.phase(),
        }
        .into());
    }
    if game.turn() != team {
        return Err(CommandError::NotYourTurn(game.turn()));
    }
    Ok(())
}

/// Reset the clue and guess budget after the turn moved on
fn close_turn(game: &mut GameSession) -> Result<(), GameError> {
    game.clear_clue()?;
    game.set_guesses_remaining(0)
}

fn start(game: &mut GameSession, player: &str) -> CommandResult<Vec<Reply>> {
    if game.is_started() {
        return Err(CommandError::GameAlreadyRunning);
    }
    for color in TeamColor::ALL {
        if game.team(color).spymaster().is_none() {
            return Err(CommandError::MissingSpymaster(color));
        }
    }
    game.start()?;
    tracing::info!(player, game_id = %game.id(), "Started game");

    Ok(vec![
        Reply::GameStarted { turn: game.turn() },
        board_reply(game, player),
    ])
}

fn give_clue(
    game: &mut GameSession,
    player: &str,
    word: &str,
    count: u32,
) -> CommandResult<Vec<Reply>> {
    let team = require_member(game, player)?;
    if game.team(team).spymaster() != Some(player) {
        return Err(CommandError::NotSpymaster(team));
    }
    require_turn(game, team)?;
    if game.clue().is_some() {
        return Err(CommandError::ClueAlreadyGiven);
    }

    let word = normalize_word(word);
    if game.board().contains(&word) {
        return Err(CommandError::ClueOnBoard);
    }

    // A zero clue lets the team keep guessing until they miss
    let guesses = match count {
        0 => BOARD_SIZE as u32,
        n => n.saturating_add(1),
    };
    game.set_clue(Clue {
        word: word.clone(),
        count,
    })?;
    game.set_guesses_remaining(guesses)?;

    Ok(vec![Reply::ClueGiven {
        team,
        clue: word,
        count,
        guesses,
    }])
}

fn pass(game: &mut GameSession, player: &str) -> CommandResult<Vec<Reply>> {
    let team = require_member(game, player)?;
    if game.is_spymaster(player) {
        return Err(CommandError::SpymasterCannotPass);
    }
    require_turn(game, team)?;
    if game.clue().is_none() {
        return Err(CommandError::NoClueGiven);
    }
    let next = game.swap_turn()?;
    close_turn(game)?;
    Ok(vec![Reply::TurnChanged { team: next }])
}

fn board_reply(game: &GameSession, player: &str) -> Reply {
    let viewer = if game.is_spymaster(player) {
        Viewer::Spymaster
    } else {
        Viewer::Guesser
    };
    Reply::Board {
        player: player.to_string(),
        viewer,
        text: BoardView::new(game, viewer).render_text(),
    }
}

fn spymaster_words(game: &GameSession, player: &str) -> CommandResult<Vec<Reply>> {
    let team = require_member(game, player)?;
    if !game.is_spymaster(player) {
        return Err(CommandError::NotSpymaster(team));
    }
    Ok(vec![Reply::SpymasterWords {
        player: player.to_string(),
        team,
        words: game.remaining_words(team).to_vec(),
    }])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::WordPool;

    const CHANNEL: &str = "general";

    fn handler() -> CommandHandler {
        CommandHandler::new(Arc::new(Lobbies::new(WordPool::default_words(), Some(11))))
    }

    fn send(handler: &CommandHandler, player: &str, message: &str) -> Vec<Reply> {
        handler.handle_message(CHANNEL, player, message)
    }

    fn error_of(replies: &[Reply]) -> String {
        match replies {
            [Reply::Error { message }] => message.clone(),
            other => panic!("expected a single error, got {:?}", other),
        }
    }

    /// Deal, seat red spymaster "rs", red guesser "rg", blue spymaster "bs",
    /// blue guesser "bg", and start. Returns the starting team.
    fn started_game(handler: &CommandHandler) -> TeamColor {
        send(handler, "rs", "!codenames");
        send(handler, "rs", "!spymaster red");
        send(handler, "rg", "!join red");
        send(handler, "bs", "!spymaster blue");
        send(handler, "bg", "!join blue");
        let replies = send(handler, "rg", "!start");
        match replies.first() {
            Some(Reply::GameStarted { turn }) => *turn,
            other => panic!("game did not start: {:?}", other),
        }
    }

    fn names(team: TeamColor) -> (&'static str, &'static str) {
        match team {
            TeamColor::Red => ("rs", "rg"),
            TeamColor::Blue => ("bs", "bg"),
        }
    }

    fn words_of(handler: &CommandHandler, team: TeamColor) -> Vec<String> {
        handler
            .lobbies()
            .with_game(CHANNEL, |g| g.remaining_words(team).to_vec())
            .unwrap()
    }

    fn bystander(handler: &CommandHandler) -> String {
        handler
            .lobbies()
            .with_game(CHANNEL, |g| g.remaining_bystanders()[0].clone())
            .unwrap()
    }

    #[test]
    fn test_chatter_is_ignored() {
        let handler = handler();
        assert!(send(&handler, "ana", "good luck everyone").is_empty());
    }

    #[test]
    fn test_commands_need_a_game() {
        let handler = handler();
        assert_eq!(
            error_of(&send(&handler, "ana", "!join red")),
            CommandError::NoActiveGame.to_string()
        );
    }

    #[test]
    fn test_new_game_replies() {
        let handler = handler();
        let replies = send(&handler, "ana", "!codenames");

        assert!(matches!(replies[0], Reply::GameCreated { .. }));
        assert!(matches!(
            replies[1],
            Reply::Board {
                viewer: Viewer::Guesser,
                ..
            }
        ));
        assert!(handler.lobbies().has_game(CHANNEL));
    }

    #[test]
    fn test_start_requires_spymasters() {
        let handler = handler();
        send(&handler, "rs", "!codenames");
        send(&handler, "rs", "!spymaster red");

        assert_eq!(
            error_of(&send(&handler, "rs", "!start")),
            CommandError::MissingSpymaster(TeamColor::Blue).to_string()
        );

        send(&handler, "bs", "!spymaster blue");
        assert!(matches!(
            send(&handler, "rs", "!start")[0],
            Reply::GameStarted { .. }
        ));
        assert_eq!(
            error_of(&send(&handler, "rs", "!start")),
            CommandError::GameAlreadyRunning.to_string()
        );
    }

    #[test]
    fn test_guess_gating() {
        let handler = handler();
        let turn = started_game(&handler);
        let (spymaster, guesser) = names(turn);
        let (_, other_guesser) = names(turn.other());
        let word = words_of(&handler, turn)[0].clone();

        assert_eq!(
            error_of(&send(&handler, guesser, &format!("!guess {}", word))),
            CommandError::NoClueGiven.to_string()
        );

        send(&handler, spymaster, "!clue zebra 1");

        assert_eq!(
            error_of(&send(&handler, other_guesser, &format!("!guess {}", word))),
            CommandError::NotYourTurn(turn).to_string()
        );
        assert_eq!(
            error_of(&send(&handler, spymaster, &format!("!guess {}", word))),
            CommandError::SpymasterCannotGuess.to_string()
        );
        assert_eq!(
            error_of(&send(&handler, "stranger", &format!("!guess {}", word))),
            CommandError::NotInGame("stranger".to_string()).to_string()
        );
    }

    #[test]
    fn test_clue_rules() {
        let handler = handler();
        let turn = started_game(&handler);
        let (spymaster, guesser) = names(turn);
        let (other_spymaster, _) = names(turn.other());
        let board_word = words_of(&handler, turn)[0].clone();

        assert_eq!(
            error_of(&send(&handler, guesser, "!clue zebra 2")),
            CommandError::NotSpymaster(turn).to_string()
        );
        assert_eq!(
            error_of(&send(&handler, other_spymaster, "!clue zebra 2")),
            CommandError::NotYourTurn(turn).to_string()
        );
        assert_eq!(
            error_of(&send(
                &handler,
                spymaster,
                &format!("!clue {} 2", board_word.to_lowercase())
            )),
            CommandError::ClueOnBoard.to_string()
        );

        let replies = send(&handler, spymaster, "!clue zebra 2");
        assert_eq!(
            replies,
            vec![Reply::ClueGiven {
                team: turn,
                clue: "ZEBRA".to_string(),
                count: 2,
                guesses: 3,
            }]
        );
        assert_eq!(
            error_of(&send(&handler, spymaster, "!clue horse 1")),
            CommandError::ClueAlreadyGiven.to_string()
        );
    }

    #[test]
    fn test_correct_guesses_spend_budget_then_pass_turn() {
        let handler = handler();
        let turn = started_game(&handler);
        let (spymaster, guesser) = names(turn);
        let words = words_of(&handler, turn);

        send(&handler, spymaster, "!clue zebra 1");

        let replies = send(&handler, guesser, &format!("!guess {}", words[0]));
        assert_eq!(replies.len(), 1);
        assert!(matches!(
            replies[0],
            Reply::GuessResolved {
                outcome: GuessOutcome::Correct,
                guesses_remaining: 1,
                ..
            }
        ));

        let replies = send(&handler, guesser, &format!("!guess {}", words[1].to_lowercase()));
        assert_eq!(replies[1], Reply::TurnChanged { team: turn.other() });

        let (state_turn, clue, guesses) = handler
            .lobbies()
            .with_game(CHANNEL, |g| (g.turn(), g.clue().cloned(), g.guesses_remaining()))
            .unwrap();
        assert_eq!(state_turn, turn.other());
        assert_eq!(clue, None);
        assert_eq!(guesses, 0);
    }

    #[test]
    fn test_bystander_ends_turn() {
        let handler = handler();
        let turn = started_game(&handler);
        let (spymaster, guesser) = names(turn);
        let word = bystander(&handler);

        send(&handler, spymaster, "!clue zebra 3");
        let replies = send(&handler, guesser, &format!("!guess {}", word));

        assert!(matches!(
            replies[0],
            Reply::GuessResolved {
                outcome: GuessOutcome::Bystander,
                ..
            }
        ));
        assert_eq!(replies[1], Reply::TurnChanged { team: turn.other() });
    }

    #[test]
    fn test_invalid_and_repeat_guesses_keep_budget() {
        let handler = handler();
        let turn = started_game(&handler);
        let (spymaster, guesser) = names(turn);
        let word = words_of(&handler, turn)[0].clone();

        send(&handler, spymaster, "!clue zebra 2");
        let replies = send(&handler, guesser, "!guess definitely-not-a-card");
        assert!(matches!(
            replies[0],
            Reply::GuessResolved {
                outcome: GuessOutcome::InvalidWord,
                guesses_remaining: 3,
                ..
            }
        ));

        send(&handler, guesser, &format!("!guess {}", word));
        let replies = send(&handler, guesser, &format!("!guess {}", word));
        assert_eq!(replies.len(), 1);
        assert!(matches!(
            replies[0],
            Reply::GuessResolved {
                outcome: GuessOutcome::AlreadyGuessed,
                guesses_remaining: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_assassin_ends_and_removes_game() {
        let handler = handler();
        let turn = started_game(&handler);
        let (spymaster, guesser) = names(turn);
        let assassin = handler
            .lobbies()
            .with_game(CHANNEL, |g| g.board().assassin().map(str::to_string))
            .flatten()
            .unwrap();

        send(&handler, spymaster, "!clue zebra 1");
        let replies = send(&handler, guesser, &format!("!guess {}", assassin));

        assert_eq!(
            replies.last(),
            Some(&Reply::GameOver {
                winner: turn.other(),
                reason: WinReason::Assassin,
            })
        );
        assert!(!handler.lobbies().has_game(CHANNEL));
    }

    #[test]
    fn test_team_wins_by_finding_all_words() {
        let handler = handler();
        let turn = started_game(&handler);
        let (spymaster, guesser) = names(turn);
        let words = words_of(&handler, turn);

        send(&handler, spymaster, "!clue zebra 0");
        let mut last = Vec::new();
        for word in &words {
            last = send(&handler, guesser, &format!("!guess {}", word));
        }

        assert_eq!(
            last.last(),
            Some(&Reply::GameOver {
                winner: turn,
                reason: WinReason::AllWordsFound,
            })
        );
        assert!(!handler.lobbies().has_game(CHANNEL));
    }

    #[test]
    fn test_pass() {
        let handler = handler();
        let turn = started_game(&handler);
        let (spymaster, guesser) = names(turn);
        let (_, other_guesser) = names(turn.other());

        assert_eq!(
            error_of(&send(&handler, guesser, "!pass")),
            CommandError::NoClueGiven.to_string()
        );

        send(&handler, spymaster, "!clue zebra 2");

        assert_eq!(
            error_of(&send(&handler, spymaster, "!pass")),
            CommandError::SpymasterCannotPass.to_string()
        );
        assert_eq!(
            error_of(&send(&handler, other_guesser, "!pass")),
            CommandError::NotYourTurn(turn).to_string()
        );
        assert_eq!(
            send(&handler, guesser, "!pass"),
            vec![Reply::TurnChanged { team: turn.other() }]
        );
    }

    #[test]
    fn test_spymaster_views() {
        let handler = handler();
        let turn = started_game(&handler);
        let (spymaster, guesser) = names(turn);

        let replies = send(&handler, spymaster, "!words");
        match &replies[0] {
            Reply::SpymasterWords { team, words, .. } => {
                assert_eq!(*team, turn);
                assert_eq!(*words, words_of(&handler, turn));
            }
            other => panic!("unexpected reply {:?}", other),
        }
        assert_eq!(replies[0].private_to(), Some(spymaster));

        assert_eq!(
            error_of(&send(&handler, guesser, "!words")),
            CommandError::NotSpymaster(turn).to_string()
        );

        let board = send(&handler, spymaster, "!board");
        assert_eq!(board[0].private_to(), Some(spymaster));
        let board = send(&handler, guesser, "!board");
        assert_eq!(board[0].private_to(), None);
    }

    #[test]
    fn test_finished_game_cleanup_spares_new_deal() {
        let handler = handler();
        let turn = started_game(&handler);
        let (spymaster, guesser) = names(turn);
        let assassin = handler
            .lobbies()
            .with_game(CHANNEL, |g| g.board().assassin().map(str::to_string))
            .flatten()
            .unwrap();
        send(&handler, spymaster, "!clue zebra 1");

        let replies = send(&handler, guesser, &format!("!guess {}", assassin));
        assert!(matches!(replies.last(), Some(Reply::GameOver { .. })));

        let replies = send(&handler, "ana", "!codenames");
        let Reply::GameCreated { game_id, .. } = &replies[0] else {
            panic!("expected a new game, got {:?}", replies[0]);
        };
        assert_eq!(handler.lobbies().with_game(CHANNEL, |g| g.id()), Some(*game_id));

        // A late cleanup for an old game must not touch the new one
        assert!(handler.lobbies().end_game_if(CHANNEL, uuid::Uuid::new_v4()).is_none());
        assert!(handler.lobbies().has_game(CHANNEL));
    }

    #[test]
    fn test_end_game() {
        let handler = handler();
        send(&handler, "ana", "!codenames");

        assert!(matches!(
            send(&handler, "ana", "!end")[0],
            Reply::GameEnded { .. }
        ));
        assert_eq!(
            error_of(&send(&handler, "ana", "!end")),
            CommandError::NoActiveGame.to_string()
        );
    }

    #[test]
    fn test_channels_are_independent() {
        let handler = handler();
        handler.handle_message("one", "ana", "!codenames");
        handler.handle_message("two", "bo", "!codenames");
        handler.handle_message("one", "ana", "!end");

        assert!(!handler.lobbies().has_game("one"));
        assert!(handler.lobbies().has_game("two"));
    }
}
