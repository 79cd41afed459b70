use std::collections::HashSet;
use std::path::Path;

use anyhow::Result;
use once_cell::sync::Lazy;
use rand::Rng;
use tokio::fs;

/// Word list bundled with the binary, used when no file is configured
static DEFAULT_WORDS: Lazy<Vec<String>> =
    Lazy::new(|| WordPool::parse(include_str!("../../data/words.txt")).words);

/// Normalise a word for storage and comparison: trimmed and upper-cased
pub fn normalize_word(word: &str) -> String {
    word.trim().to_uppercase()
}

/// Pool of distinct candidate words that boards are drawn from.
///
/// Drawing is destructive; callers that want to reuse a pool across games
/// should hand a clone to the board generator.
#[derive(Debug, Clone, Default)]
pub struct WordPool {
    words: Vec<String>,
}

impl WordPool {
    /// Load a newline-delimited word list from a file
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        let pool = Self::parse(&content);

        tracing::info!(words = pool.len(), "Loaded word pool");

        Ok(pool)
    }

    /// Parse a word list. Blank lines and `#` comments are skipped.
    pub fn parse(content: &str) -> Self {
        Self::from_words(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        )
    }

    /// Build a pool from arbitrary entries, dropping blanks and duplicates
    pub fn from_words<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let words = entries
            .into_iter()
            .map(|entry| normalize_word(entry.as_ref()))
            .filter(|word| !word.is_empty())
            .filter(|word| seen.insert(word.clone()))
            .collect();

        Self { words }
    }

    /// The bundled default word list
    pub fn default_words() -> Self {
        Self {
            words: DEFAULT_WORDS.clone(),
        }
    }

    /// Remove and return one word chosen uniformly at random
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<String> {
        if self.words.is_empty() {
            return None;
        }
        let idx = rng.random_range(0..self.words.len());
        Some(self.words.swap_remove(idx))
    }

    pub fn contains(&self, word: &str) -> bool {
        let word = normalize_word(word);
        self.words.iter().any(|w| *w == word)
    }

    /// Get the number of words left in the pool
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Check if the pool is empty
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
