use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::{
    dictionary::{normalize_word, WordPool},
    error::{GameError, GameResult},
    models::{TeamColor, WordRole},
};

/// Words on a standard board
pub const BOARD_SIZE: usize = 25;
/// Words held by the team that moves first
pub const STARTING_TEAM_WORDS: usize = 9;
/// Words held by the team that moves second
pub const SECOND_TEAM_WORDS: usize = 8;
pub const BYSTANDER_WORDS: usize = 7;

/// The visible word set plus its hidden role partition.
///
/// A board never changes after construction; revealing words is tracked by
/// the session that owns it. Only [`Board::with_roles`] builds one, so the
/// role partition is always validated.
#[derive(Debug, Clone, Serialize)]
pub struct Board {
    words: Vec<String>,
    roles: HashMap<String, WordRole>,
    starting_team: TeamColor,
}

impl Board {
    /// Build a board from explicit role groups.
    ///
    /// Group sizes are free, but every word must be distinct, both teams need
    /// at least one word and there must be exactly one assassin. Display order
    /// is red, blue, bystanders, assassin.
    pub fn with_roles<S: AsRef<str>>(
        red: &[S],
        blue: &[S],
        bystanders: &[S],
        assassins: &[S],
        starting_team: TeamColor,
    ) -> GameResult<Self> {
        if red.is_empty() {
            return Err(GameError::EmptyTeam(TeamColor::Red));
        }
        if blue.is_empty() {
            return Err(GameError::EmptyTeam(TeamColor::Blue));
        }
        if assassins.len() != 1 {
            return Err(GameError::AssassinCount(assassins.len()));
        }

        let groups = [
            (red, WordRole::Red),
            (blue, WordRole::Blue),
            (bystanders, WordRole::Bystander),
            (assassins, WordRole::Assassin),
        ];

        let mut words = Vec::new();
        let mut roles = HashMap::new();
        for (group, role) in groups {
            for word in group {
                let word = normalize_word(word.as_ref());
                if roles.insert(word.clone(), role).is_some() {
                    return Err(GameError::DuplicateWord(word));
                }
                words.push(word);
            }
        }

        Ok(Self {
            words,
            roles,
            starting_team,
        })
    }

    /// All words in display order
    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn starting_team(&self) -> TeamColor {
        self.starting_team
    }

    pub fn contains(&self, word: &str) -> bool {
        self.roles.contains_key(word)
    }

    /// Hidden role of a (normalised) word, if it is on the board
    pub fn role_of(&self, word: &str) -> Option<WordRole> {
        self.roles.get(word).copied()
    }

    /// Words holding the given role, in display order
    pub fn words_with_role(&self, role: WordRole) -> Vec<String> {
        self.words
            .iter()
            .filter(|word| self.roles.get(*word) == Some(&role))
            .cloned()
            .collect()
    }

    pub fn assassin(&self) -> Option<&str> {
        self.words
            .iter()
            .find(|word| self.roles.get(*word) == Some(&WordRole::Assassin))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

pub struct BoardGenerator;

impl BoardGenerator {
    /// Deal a standard 25 word board from the pool using the thread RNG
    pub fn generate(pool: &mut WordPool) -> GameResult<Board> {
        let mut rng = rand::rng();
        Self::generate_with_rng(pool, &mut rng)
    }

    /// Deal a standard board with a caller supplied RNG.
    ///
    /// Consumes exactly [`BOARD_SIZE`] words from the pool on success and
    /// leaves it untouched on failure.
    pub fn generate_with_rng<R: Rng + ?Sized>(
        pool: &mut WordPool,
        rng: &mut R,
    ) -> GameResult<Board> {
        if pool.len() < BOARD_SIZE {
            return Err(GameError::InsufficientWords {
                needed: BOARD_SIZE,
                available: pool.len(),
            });
        }

        let mut drawn: Vec<String> = (0..BOARD_SIZE)
            .filter_map(|_| pool.draw(&mut *rng))
            .collect();

        let starting_team = if rng.random_bool(0.5) {
            TeamColor::Red
        } else {
            TeamColor::Blue
        };

        // Deal from the back of a shuffled hand, like drawing from a deck
        drawn.shuffle(rng);
        let mut deal = |count: usize| drawn.split_off(drawn.len() - count);
        let first = deal(STARTING_TEAM_WORDS);
        let second = deal(SECOND_TEAM_WORDS);
        let bystanders = deal(BYSTANDER_WORDS);
        let assassin = drawn;

        let (red, blue) = match starting_team {
            TeamColor::Red => (first, second),
            TeamColor::Blue => (second, first),
        };

        let mut board = Board::with_roles(&red, &blue, &bystanders, &assassin, starting_team)?;

        // Display order must not leak allocation order
        board.words.shuffle(rng);

        tracing::debug!(
            starting_team = %starting_team,
            pool_remaining = pool.len(),
            "Dealt new board"
        );

        Ok(board)
    }
}
