//! 8x8 Othello board: cell storage, stone counts and text rendering.
//!
//! The board holds no rule knowledge. Placement with captures lives in
//! [`crate::engine`]; [`Board::set`] is a raw write used by the engine and by
//! test setups.

use std::fmt;
use std::str::FromStr;

use crate::constants::{CELLS, GLYPH_BLACK, GLYPH_CANDIDATE, GLYPH_EMPTY, GLYPH_WHITE, N};
use crate::error::{Error, Result};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Black,
    White,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Black => Side::White,
            Side::White => Side::Black,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Black => write!(f, "Black"),
            Side::White => write!(f, "White"),
        }
    }
}

/// Content of a single board cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Cell {
    #[default]
    Empty,
    Black,
    White,
}

impl Cell {
    /// The side owning this cell, or `None` when empty.
    pub fn side(self) -> Option<Side> {
        match self {
            Cell::Empty => None,
            Cell::Black => Some(Side::Black),
            Cell::White => Some(Side::White),
        }
    }

    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

impl From<Side> for Cell {
    fn from(side: Side) -> Self {
        match side {
            Side::Black => Cell::Black,
            Side::White => Cell::White,
        }
    }
}

/// A board coordinate, zero-based.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Move {
    pub row: usize,
    pub col: usize,
}

impl Move {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Checked constructor rejecting coordinates outside the board.
    pub fn checked(row: usize, col: usize) -> Result<Self> {
        if row >= N || col >= N {
            return Err(Error::OutOfRange { row, col });
        }
        Ok(Self { row, col })
    }
}

/// Parse a coordinate such as `3d`, `D3` or `d3`.
///
/// The digit is the row (1-8) and the letter the column (a-h), in either
/// order and either case.
impl FromStr for Move {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let malformed = || Error::MalformedCoordinate {
            input: s.to_string(),
        };

        let bytes = s.trim().as_bytes();
        if bytes.len() != 2 {
            return Err(malformed());
        }

        let (digit, letter) = match (bytes[0], bytes[1]) {
            (d @ b'1'..=b'8', l) if l.is_ascii_alphabetic() => (d, l),
            (l, d @ b'1'..=b'8') if l.is_ascii_alphabetic() => (d, l),
            _ => return Err(malformed()),
        };

        let letter = letter.to_ascii_lowercase();
        if !(b'a'..=b'h').contains(&letter) {
            return Err(malformed());
        }

        Ok(Move::new((digit - b'1') as usize, (letter - b'a') as usize))
    }
}

/// Formats as row digit followed by column letter, e.g. `(2, 3)` -> `3d`.
/// Off-board coordinates print as `(row, col)`.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.row >= N || self.col >= N {
            return write!(f, "({}, {})", self.row, self.col);
        }
        write!(f, "{}{}", self.row + 1, char::from(b'a' + self.col as u8))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    cells: [Cell; CELLS],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// The standard opening position.
    pub fn new() -> Self {
        let mut board = Self::empty();
        board.set(3, 3, Side::White);
        board.set(4, 4, Side::White);
        board.set(3, 4, Side::Black);
        board.set(4, 3, Side::Black);
        board
    }

    /// A board with no stones at all.
    pub fn empty() -> Self {
        Self {
            cells: [Cell::Empty; CELLS],
        }
    }

    #[inline]
    fn idx(row: usize, col: usize) -> usize {
        row * N + col
    }

    pub fn get(&self, row: usize, col: usize) -> Result<Cell> {
        if row >= N || col >= N {
            return Err(Error::OutOfRange { row, col });
        }
        Ok(self.cells[Self::idx(row, col)])
    }

    /// Unchecked read for coordinates already known to be on the board.
    #[inline]
    pub(crate) fn at(&self, row: usize, col: usize) -> Cell {
        self.cells[Self::idx(row, col)]
    }

    /// Raw write with no rule checks.
    ///
    /// # Panics
    /// Panics if `(row, col)` is off the board.
    pub fn set(&mut self, row: usize, col: usize, side: Side) {
        self.cells[Self::idx(row, col)] = side.into();
    }

    /// Stone counts as `(black, white)`.
    pub fn count_stones(&self) -> (usize, usize) {
        self.cells.iter().fold((0, 0), |(b, w), cell| match cell {
            Cell::Black => (b + 1, w),
            Cell::White => (b, w + 1),
            Cell::Empty => (b, w),
        })
    }

    /// Iterate over all cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (Move, Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, &cell)| (Move::new(i / N, i % N), cell))
    }

    /// Render the board with column letters and row digits, marking every
    /// cell in `highlights` as a candidate move.
    pub fn render(&self, highlights: &[Move]) -> String {
        let mut out = String::new();
        let header: String = (0..N)
            .map(|c| format!(" {}", (b'a' + c as u8) as char))
            .collect();
        out.push(' ');
        out.push_str(&header);
        out.push('\n');

        for row in 0..N {
            out.push_str(&(row + 1).to_string());
            for col in 0..N {
                let ch = match self.at(row, col) {
                    Cell::Black => GLYPH_BLACK,
                    Cell::White => GLYPH_WHITE,
                    Cell::Empty if highlights.contains(&Move::new(row, col)) => GLYPH_CANDIDATE,
                    Cell::Empty => GLYPH_EMPTY,
                };
                out.push(' ');
                out.push(ch);
            }
            out.push(' ');
            out.push_str(&(row + 1).to_string());
            out.push('\n');
        }

        out.push(' ');
        out.push_str(&header);
        out.push('\n');
        out
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&[]))
    }
}

/// Parse a board from 64 cell glyphs (`X`, `O`, `.`), whitespace ignored.
impl FromStr for Board {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let glyphs: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
        if glyphs.len() != CELLS {
            return Err(Error::InvalidBoardLength {
                expected: CELLS,
                got: glyphs.len(),
            });
        }

        let mut board = Board::empty();
        for (i, &ch) in glyphs.iter().enumerate() {
            let cell = match ch.to_ascii_uppercase() {
                'X' | 'B' => Cell::Black,
                'O' | 'W' => Cell::White,
                '.' | '-' => Cell::Empty,
                _ => {
                    return Err(Error::InvalidCellCharacter {
                        character: ch,
                        position: i,
                    });
                }
            };
            board.cells[i] = cell;
        }
        Ok(board)
    }
}
