//! Reversi rules: capture evaluation, placement, legal moves and scoring.
//!
//! Every rule question goes through the same ray walk. In simulation mode
//! [`evaluate_captures`] (or the read-only [`count_captures`]) answers "how
//! many stones would this placement flip", non-zero meaning legal; run for
//! real it also flips them.
//!
//! A game ends after two consecutive passes, not on the tournament rule
//! ("board full or neither side can move"). A full board makes both sides
//! pass, so it ends the same way.

use crate::board::{Board, Cell, Move, Side};
use crate::constants::{DIRECTIONS, N};

/// Ordered list of moves a side placed during one game.
pub type MoveHistory = Vec<Move>;

/// Result of a finished game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    Win(Side),
    Draw,
}

impl Outcome {
    pub fn winner(self) -> Option<Side> {
        match self {
            Outcome::Win(side) => Some(side),
            Outcome::Draw => None,
        }
    }
}

/// Step from `(row, col)` one cell along `dir`, or `None` if that leaves the board.
#[inline]
fn step(row: usize, col: usize, dir: (isize, isize)) -> Option<(usize, usize)> {
    let r = row.checked_add_signed(dir.0)?;
    let c = col.checked_add_signed(dir.1)?;
    (r < N && c < N).then_some((r, c))
}

/// Number of opponent stones captured along one ray from `mv`.
///
/// The walk stops at the first empty cell, the board edge, or a stone of
/// `side`. Only the last case closes the ray, and it captures only if at
/// least one opponent stone was passed on the way.
fn ray_captures(board: &Board, mv: Move, side: Side, dir: (isize, isize)) -> usize {
    let opponent = Cell::from(side.opponent());
    let own = Cell::from(side);
    let mut saw_opponent = false;
    let mut distance = 0;
    let (mut row, mut col) = (mv.row, mv.col);

    while let Some((r, c)) = step(row, col, dir) {
        (row, col) = (r, c);
        distance += 1;
        match board.at(r, c) {
            Cell::Empty => return 0,
            cell if cell == own => return if saw_opponent { distance - 1 } else { 0 },
            cell => {
                debug_assert_eq!(cell, opponent);
                saw_opponent = true;
            }
        }
    }
    0
}

/// Count the stones `side` would capture by playing at `mv`.
///
/// The target cell itself is not inspected.
pub fn count_captures(board: &Board, mv: Move, side: Side) -> usize {
    DIRECTIONS
        .iter()
        .map(|&dir| ray_captures(board, mv, side, dir))
        .sum()
}

/// Evaluate the captures of `side` playing at `mv`.
///
/// Returns the number of captured stones. Unless `simulate` is set, every
/// captured stone is also flipped to `side`.
pub fn evaluate_captures(board: &mut Board, mv: Move, side: Side, simulate: bool) -> usize {
    let mut total = 0;
    for &dir in &DIRECTIONS {
        let run = ray_captures(board, mv, side, dir);
        total += run;
        if simulate || run == 0 {
            continue;
        }
        let (mut row, mut col) = (mv.row, mv.col);
        for _ in 0..run {
            // A closed run never leaves the board.
            if let Some((r, c)) = step(row, col, dir) {
                (row, col) = (r, c);
                board.set(r, c, side);
            }
        }
    }
    total
}

/// Play `side` at `mv`, flipping every captured run.
///
/// Returns false and leaves the board untouched if the cell is off the
/// board, already occupied, or would capture nothing.
pub fn place(board: &mut Board, mv: Move, side: Side) -> bool {
    match board.get(mv.row, mv.col) {
        Ok(cell) if cell.is_empty() => {}
        _ => return false,
    }
    if count_captures(board, mv, side) == 0 {
        return false;
    }
    board.set(mv.row, mv.col, side);
    evaluate_captures(board, mv, side, false);
    true
}

/// Returns true if any of the eight neighbours of `mv` holds a stone of `side`.
fn touches(board: &Board, mv: Move, side: Side) -> bool {
    let target = Cell::from(side);
    DIRECTIONS
        .iter()
        .filter_map(|&dir| step(mv.row, mv.col, dir))
        .any(|(r, c)| board.at(r, c) == target)
}

/// All legal moves for `side`, in row-major order.
pub fn legal_moves(board: &Board, side: Side) -> Vec<Move> {
    board
        .cells()
        .filter(|&(mv, cell)| {
            cell.is_empty()
                && touches(board, mv, side.opponent())
                && count_captures(board, mv, side) > 0
        })
        .map(|(mv, _)| mv)
        .collect()
}

/// Compare stone counts: more stones wins, equal counts draw.
pub fn winner(board: &Board) -> Outcome {
    let (black, white) = board.count_stones();
    match black.cmp(&white) {
        std::cmp::Ordering::Greater => Outcome::Win(Side::Black),
        std::cmp::Ordering::Less => Outcome::Win(Side::White),
        std::cmp::Ordering::Equal => Outcome::Draw,
    }
}

/// A single game in progress: board, side to move, and each side's history.
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    to_move: Side,
    /// Consecutive passes; two end the game
    passes: u8,
    black_history: MoveHistory,
    white_history: MoveHistory,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// A new game from the opening position with Black to move.
    pub fn new() -> Self {
        Self::from_position(Board::new(), Side::Black)
    }

    /// A game starting from an arbitrary position.
    pub fn from_position(board: Board, to_move: Side) -> Self {
        Self {
            board,
            to_move,
            passes: 0,
            black_history: Vec::new(),
            white_history: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn to_move(&self) -> Side {
        self.to_move
    }

    /// Moves placed so far by `side`.
    pub fn history(&self, side: Side) -> &[Move] {
        match side {
            Side::Black => &self.black_history,
            Side::White => &self.white_history,
        }
    }

    /// Legal moves for the side to move.
    pub fn legal_moves(&self) -> Vec<Move> {
        legal_moves(&self.board, self.to_move)
    }

    /// Place a stone for `side` and record it in that side's history.
    ///
    /// Does not change the side to move; see [`Game::play`].
    pub fn place(&mut self, mv: Move, side: Side) -> bool {
        if !place(&mut self.board, mv, side) {
            return false;
        }
        match side {
            Side::Black => self.black_history.push(mv),
            Side::White => self.white_history.push(mv),
        }
        true
    }

    /// Play `mv` for the side to move and hand the turn over.
    pub fn play(&mut self, mv: Move) -> bool {
        if !self.place(mv, self.to_move) {
            return false;
        }
        self.passes = 0;
        self.to_move = self.to_move.opponent();
        true
    }

    /// Pass the turn without placing a stone.
    pub fn pass(&mut self) {
        self.passes = self.passes.saturating_add(1);
        self.to_move = self.to_move.opponent();
    }

    /// True once both sides have passed in succession.
    pub fn is_over(&self) -> bool {
        self.passes >= 2
    }

    pub fn outcome(&self) -> Outcome {
        winner(&self.board)
    }
}
