use serde::Serialize;

use super::{Clue, TeamColor};

/// One team's words, roster and clue history.
///
/// `unrevealed` only ever shrinks; `words` is the board's initial
/// allocation and never changes.
#[derive(Debug, Clone, Serialize)]
pub struct Team {
    pub color: TeamColor,
    unrevealed: Vec<String>,
    words: Vec<String>,
    clues: Vec<Clue>,
    players: Vec<String>,
    spymaster: Option<String>,
}

impl Team {
    pub fn new(color: TeamColor, words: Vec<String>) -> Self {
        Self {
            color,
            unrevealed: words.clone(),
            words,
            clues: Vec::new(),
            players: Vec::new(),
            spymaster: None,
        }
    }

    /// Words of this team that nobody has guessed yet
    pub fn unrevealed(&self) -> &[String] {
        &self.unrevealed
    }

    /// The team's full allocation, revealed or not
    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn has_unrevealed(&self, word: &str) -> bool {
        self.unrevealed.iter().any(|w| w == word)
    }

    /// Remove a word from the unrevealed set. Returns false if it was not there.
    pub(crate) fn reveal(&mut self, word: &str) -> bool {
        match self.unrevealed.iter().position(|w| w == word) {
            Some(idx) => {
                self.unrevealed.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn is_depleted(&self) -> bool {
        self.unrevealed.is_empty()
    }

    /// Own words revealed so far
    pub fn score(&self) -> usize {
        self.words.len() - self.unrevealed.len()
    }

    pub fn clues(&self) -> &[Clue] {
        &self.clues
    }

    pub(crate) fn push_clue(&mut self, clue: Clue) {
        self.clues.push(clue);
    }

    pub fn players(&self) -> &[String] {
        &self.players
    }

    pub fn has_player(&self, name: &str) -> bool {
        self.players.iter().any(|p| p == name)
    }

    pub(crate) fn add_player(&mut self, name: String) {
        if !self.has_player(&name) {
            self.players.push(name);
        }
    }

    pub fn spymaster(&self) -> Option<&str> {
        self.spymaster.as_deref()
    }

    pub(crate) fn set_spymaster(&mut self, name: String) {
        self.add_player(name.clone());
        self.spymaster = Some(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_reveal_shrinks_unrevealed_only() {
        let mut team = Team::new(TeamColor::Red, words(&["DOG", "CAT"]));

        assert!(team.reveal("DOG"));
        assert!(!team.reveal("DOG"));
        assert_eq!(team.unrevealed(), &["CAT".to_string()]);
        assert_eq!(team.words().len(), 2);
        assert_eq!(team.score(), 1);
        assert!(!team.is_depleted());

        assert!(team.reveal("CAT"));
        assert!(team.is_depleted());
        assert_eq!(team.score(), 2);
    }

    #[test]
    fn test_spymaster_joins_roster() {
        let mut team = Team::new(TeamColor::Blue, words(&["SUN"]));
        team.add_player("ana".to_string());
        team.add_player("ana".to_string());
        team.set_spymaster("bo".to_string());

        assert_eq!(team.players(), &["ana".to_string(), "bo".to_string()]);
        assert_eq!(team.spymaster(), Some("bo"));
    }
}
