//! Tic-tac-toe board state: marking, win scan, rendering.
//!
//! Pure data, no channels or tasks. The room actor owns one [`Board`]
//! and is the only thing that ever mutates it.

use std::fmt;

use crate::RoomError;

/// The symbol a member owns for the duration of one game.
///
/// Slot 0 in the room's member list always plays noughts, slot 1 plays
/// crosses; the start-of-game shuffle decides who lands in which slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Nought,
    Cross,
}

impl Mark {
    /// The glyph used on the wire.
    pub fn glyph(self) -> char {
        match self {
            Mark::Nought => 'o',
            Mark::Cross => 'x',
        }
    }

    /// The mark owned by the member in the given slot.
    pub fn for_slot(slot: usize) -> Mark {
        if slot == 0 { Mark::Nought } else { Mark::Cross }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

/// The 8 winning lines, scanned in this order: rows, columns, diagonals.
const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [6, 4, 2],
];

/// A 3x3 grid addressed by the 1-based cell numbers clients type:
///
/// ```text
///  1 | 2 | 3
/// ---+---+---
///  4 | 5 | 6
/// ---+---+---
///  7 | 8 | 9
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [Option<Mark>; 9],
}

impl Board {
    pub fn new() -> Board {
        Board::default()
    }

    /// Writes `mark` into the given 1-based cell.
    ///
    /// # Errors
    /// Returns `CellOutOfRange` for cells outside 1..=9 and `CellTaken`
    /// when the cell is already marked. The board is unchanged on error.
    pub fn mark(&mut self, cell: usize, mark: Mark) -> Result<(), RoomError> {
        if !(1..=9).contains(&cell) {
            return Err(RoomError::CellOutOfRange);
        }
        let slot = &mut self.cells[cell - 1];
        if slot.is_some() {
            return Err(RoomError::CellTaken);
        }
        *slot = Some(mark);
        Ok(())
    }

    /// The mark holding the first complete line, if any.
    ///
    /// A deterministic function of board contents: lines are scanned in
    /// the fixed order of [`LINES`], and the first line whose three
    /// cells carry the same mark decides the winner.
    pub fn winner(&self) -> Option<Mark> {
        for [a, b, c] in LINES {
            if let Some(mark) = self.cells[a] {
                if self.cells[b] == Some(mark) && self.cells[c] == Some(mark) {
                    return Some(mark);
                }
            }
        }
        None
    }

    /// True when every cell is marked.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Clears every cell.
    pub fn reset(&mut self) {
        self.cells = [None; 9];
    }

    /// Renders the grid as three rows of three glyphs, one row per
    /// line, with empty cells shown as `.`.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(11);
        for (i, cell) in self.cells.iter().enumerate() {
            out.push(cell.map_or('.', Mark::glyph));
            if i % 3 == 2 && i != 8 {
                out.push('\n');
            }
        }
        out
    }
}
