use std::sync::Mutex;

use dashmap::{mapref::entry::Entry, DashMap};
use rand::{rngs::StdRng, SeedableRng};
use uuid::Uuid;

use crate::{
    dictionary::WordPool,
    error::GameResult,
    game::{BoardGenerator, GameSession},
};

/// Live games keyed by chat channel id.
///
/// Every mutation of a session happens under its map entry's write guard,
/// so commands against one channel are serialised while other channels run
/// independently.
pub struct Lobbies {
    /// Master word list; each game deals from its own copy
    pool: WordPool,
    rng: Mutex<StdRng>,
    games: DashMap<String, GameSession>,
}

impl Lobbies {
    /// `seed` makes every dealt board reproducible; `None` seeds from the OS
    pub fn new(pool: WordPool, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            pool,
            rng: Mutex::new(rng),
            games: DashMap::new(),
        }
    }

    pub fn pool(&self) -> &WordPool {
        &self.pool
    }

    /// Deal a new game in the channel, replacing any game already there.
    ///
    /// Returns the new game's id.
    pub fn new_game(&self, channel_id: &str) -> GameResult<Uuid> {
        self.new_game_with(channel_id, |game| game.id())
    }

    /// Deal a new game and run `f` on it before it is published.
    ///
    /// Whatever `f` reads describes this deal even if another caller
    /// replaces the channel's game straight after.
    pub fn new_game_with<R>(
        &self,
        channel_id: &str,
        f: impl FnOnce(&GameSession) -> R,
    ) -> GameResult<R> {
        let board = {
            let mut pool = self.pool.clone();
            let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            BoardGenerator::generate_with_rng(&mut pool, &mut *rng)?
        };
        let session = GameSession::new(board);
        let game_id = session.id();
        let result = f(&session);

        match self.games.entry(channel_id.to_string()) {
            Entry::Occupied(mut entry) => {
                tracing::info!(
                    channel_id,
                    old_game = %entry.get().id(),
                    new_game = %game_id,
                    "Replacing game in channel"
                );
                entry.insert(session);
            }
            Entry::Vacant(entry) => {
                entry.insert(session);
            }
        }

        Ok(result)
    }

    pub fn has_game(&self, channel_id: &str) -> bool {
        self.games.contains_key(channel_id)
    }

    /// Run `f` against the channel's game with exclusive access
    pub fn with_game<R>(
        &self,
        channel_id: &str,
        f: impl FnOnce(&mut GameSession) -> R,
    ) -> Option<R> {
        self.games.get_mut(channel_id).map(|mut game| f(game.value_mut()))
    }

    /// Drop the channel's game, returning it if there was one
    pub fn end_game(&self, channel_id: &str) -> Option<GameSession> {
        let removed = self.games.remove(channel_id).map(|(_, game)| game);
        if let Some(game) = &removed {
            tracing::info!(channel_id, game_id = %game.id(), "Removed game from channel");
        }
        removed
    }

    /// Drop the channel's game only if it is still `game_id`.
    ///
    /// A game dealt into the channel since the caller last looked survives.
    pub fn end_game_if(&self, channel_id: &str, game_id: Uuid) -> Option<GameSession> {
        let removed = self
            .games
            .remove_if(channel_id, |_, game| game.id() == game_id)
            .map(|(_, game)| game);
        match &removed {
            Some(_) => {
                tracing::info!(channel_id, game_id = %game_id, "Removed game from channel")
            }
            None => {
                tracing::debug!(channel_id, game_id = %game_id, "Game already gone from channel")
            }
        }
        removed
    }

    /// Count of channels with a game
    pub fn active_games(&self) -> usize {
        self.games.len()
    }
}
