//! Constants for board geometry, training defaults and rendering.
//!
//! The board is a plain 8x8 grid addressed by `(row, col)` with both
//! coordinates in `0..N`. The four centre cells are occupied from the first
//! turn and are never selectable, so the weight map ignores them.

// =============================================================================
// Board Geometry
// =============================================================================

/// Board size (NxN).
pub const N: usize = 8;

/// Number of cells on the board.
pub const CELLS: usize = N * N;

/// The four centre cells holding the opening stones.
pub const CENTER: [(usize, usize); 4] = [(3, 3), (3, 4), (4, 3), (4, 4)];

/// Number of cells that carry a learned weight (everything but the centre).
pub const ELIGIBLE_CELLS: usize = CELLS - CENTER.len();

/// Unit vectors for the eight capture rays, as `(d_row, d_col)`.
/// Order: E, SE, S, SW, W, NW, N, NE
pub const DIRECTIONS: [(isize, isize); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

// =============================================================================
// Weight Map Parameters
// =============================================================================

/// Initial raw weight of every eligible cell.
pub const DEFAULT_WEIGHT: i64 = 1;

/// Value stored for the centre cells. Never read by the policies.
pub const CENTER_SENTINEL: i64 = 0;

/// Upper bound of the normalized weight range (`K`).
pub const NORMALIZE_SCALE: i64 = 10_000;

/// Default file the weight map is persisted to.
pub const DEFAULT_WEIGHTS_FILE: &str = "othello_win_weight.json";

// =============================================================================
// Training Defaults
// =============================================================================

/// Default number of self-play trials per run.
pub const N_TRIALS: usize = 1000;

/// Weight added to every cell played by the winning side.
pub const WIN_REWARD: i64 = 1;

/// Weight removed from every cell played by the losing side.
pub const LOSS_PENALTY: i64 = 1;

// =============================================================================
// Rendering Glyphs
// =============================================================================

/// Black stone.
pub const GLYPH_BLACK: char = 'X';

/// White stone.
pub const GLYPH_WHITE: char = 'O';

/// Empty cell.
pub const GLYPH_EMPTY: char = '.';

/// Empty cell highlighted as a legal move.
pub const GLYPH_CANDIDATE: char = '*';

/// Returns true if `(row, col)` is one of the four centre cells.
#[inline]
pub const fn is_center(row: usize, col: usize) -> bool {
    (row == 3 || row == 4) && (col == 3 || col == 4)
}
