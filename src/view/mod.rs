//! Presentation helpers. Nothing here mutates a session; everything is
//! derived from the board and the guessed set.

use serde::Serialize;

use crate::{game::GameSession, models::WordRole};

/// Cells per board row
pub const GRID_COLUMNS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const HIDDEN: Rgb = Rgb(255, 255, 255);
pub const RED_REVEALED: Rgb = Rgb(242, 96, 80);
pub const BLUE_REVEALED: Rgb = Rgb(82, 183, 255);
pub const BYSTANDER_REVEALED: Rgb = Rgb(209, 195, 67);
pub const RED_SECRET: Rgb = Rgb(242, 185, 177);
pub const BLUE_SECRET: Rgb = Rgb(184, 225, 255);
pub const BYSTANDER_SECRET: Rgb = Rgb(209, 203, 151);
pub const ASSASSIN: Rgb = Rgb(161, 158, 137);

/// Who is looking at the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Viewer {
    Guesser,
    Spymaster,
}

/// Display colour of a single word.
///
/// Guessers only see colours for revealed words. Spymasters see every role,
/// in a pale shade until the word is revealed.
pub fn cell_color(role: WordRole, guessed: bool, viewer: Viewer) -> Rgb {
    match (role, guessed, viewer) {
        (WordRole::Assassin, true, _) | (WordRole::Assassin, false, Viewer::Spymaster) => {
            ASSASSIN
        }
        (_, false, Viewer::Guesser) => HIDDEN,
        (WordRole::Red, true, _) => RED_REVEALED,
        (WordRole::Blue, true, _) => BLUE_REVEALED,
        (WordRole::Bystander, true, _) => BYSTANDER_REVEALED,
        (WordRole::Red, false, Viewer::Spymaster) => RED_SECRET,
        (WordRole::Blue, false, Viewer::Spymaster) => BLUE_SECRET,
        (WordRole::Bystander, false, Viewer::Spymaster) => BYSTANDER_SECRET,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellView {
    pub word: String,
    /// `None` when the viewer may not know the role
    pub role: Option<WordRole>,
    pub guessed: bool,
    pub color: Rgb,
}

/// Board as seen by one kind of viewer, in display order
#[derive(Debug, Clone, Serialize)]
pub struct BoardView {
    pub viewer: Viewer,
    pub cells: Vec<CellView>,
}

impl BoardView {
    pub fn new(session: &GameSession, viewer: Viewer) -> Self {
        let board = session.board();
        let cells = board
            .words()
            .iter()
            .filter_map(|word| {
                let role = board.role_of(word)?;
                let guessed = session.guessed().contains(word);
                let visible = guessed || viewer == Viewer::Spymaster;
                Some(CellView {
                    word: word.clone(),
                    role: visible.then_some(role),
                    guessed,
                    color: cell_color(role, guessed, viewer),
                })
            })
            .collect();

        Self { viewer, cells }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[CellView]> {
        self.cells.chunks(GRID_COLUMNS)
    }

    /// Plain text grid. Revealed cells carry a `*`, known roles a letter:
    /// R(ed), B(lue), N (bystander), X (assassin).
    pub fn render_text(&self) -> String {
        let labels: Vec<String> = self.cells.iter().map(cell_label).collect();
        let width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0) + 2;

        labels
            .chunks(GRID_COLUMNS)
            .map(|row| {
                row.iter()
                    .map(|label| format!("{:<width$}", label, width = width))
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn cell_label(cell: &CellView) -> String {
    let marker = if cell.guessed { '*' } else { ' ' };
    let role = match cell.role {
        Some(WordRole::Red) => 'R',
        Some(WordRole::Blue) => 'B',
        Some(WordRole::Bystander) => 'N',
        Some(WordRole::Assassin) => 'X',
        None => ' ',
    };
    format!("{}{} {}", marker, role, cell.word)
}
