//! Learned per-cell weight map and its normalized snapshot.
//!
//! The raw [`WeightMap`] accumulates credit and penalty across trials and is
//! what gets persisted. Before a trial the policies read a
//! [`NormalizedWeights`] snapshot in which every eligible cell is at least 1,
//! so a cell never becomes unselectable however often it is penalized.
//!
//! The four centre cells are occupied from the first turn; they keep a
//! sentinel value and are skipped by every statistic.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::board::Move;
use crate::constants::{CENTER_SENTINEL, DEFAULT_WEIGHT, N, is_center};

/// Raw accumulated weights, one per cell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightMap {
    cells: [[i64; N]; N],
}

impl Default for WeightMap {
    fn default() -> Self {
        Self::new()
    }
}

impl WeightMap {
    /// Every eligible cell at [`DEFAULT_WEIGHT`].
    pub fn new() -> Self {
        let mut cells = [[DEFAULT_WEIGHT; N]; N];
        for (row, line) in cells.iter_mut().enumerate() {
            for (col, w) in line.iter_mut().enumerate() {
                if is_center(row, col) {
                    *w = CENTER_SENTINEL;
                }
            }
        }
        Self { cells }
    }

    /// Build a map from explicit values. Centre entries are replaced by the sentinel.
    pub fn from_grid(mut cells: [[i64; N]; N]) -> Self {
        for (row, line) in cells.iter_mut().enumerate() {
            for (col, w) in line.iter_mut().enumerate() {
                if is_center(row, col) {
                    *w = CENTER_SENTINEL;
                }
            }
        }
        Self { cells }
    }

    /// Raw weight of `mv`.
    ///
    /// # Panics
    /// Panics if `mv` is off the board.
    pub fn get(&self, mv: Move) -> i64 {
        self.cells[mv.row][mv.col]
    }

    /// Eligible (non-centre) weights in row-major order.
    pub fn eligible(&self) -> impl Iterator<Item = i64> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, line)| {
            line.iter()
                .enumerate()
                .filter(move |&(col, _)| !is_center(row, col))
                .map(|(_, &w)| w)
        })
    }

    /// Minimum and maximum over the eligible cells.
    pub fn range(&self) -> (i64, i64) {
        self.eligible()
            .fold((i64::MAX, i64::MIN), |(lo, hi), w| (lo.min(w), hi.max(w)))
    }

    /// Add `delta` to the weight of every listed cell.
    ///
    /// A cell listed twice is credited twice. Centre and off-board cells are
    /// skipped.
    pub fn credit(&mut self, cells: &[Move], delta: i64) {
        for mv in cells {
            if mv.row >= N || mv.col >= N || is_center(mv.row, mv.col) {
                continue;
            }
            let w = &mut self.cells[mv.row][mv.col];
            *w = w.saturating_add(delta);
        }
    }

    /// Rescale the eligible weights into `[1, scale]`.
    ///
    /// Each eligible weight `w` maps to
    /// `floor((w - min) * scale / (max - min + 1)) + 1`. A map that is already
    /// normalized (minimum 1, maximum at most `scale`) is returned unchanged,
    /// so normalizing a snapshot again is a no-op.
    pub fn normalized(&self, scale: i64) -> NormalizedWeights {
        debug_assert!(scale > 0);
        let (min, max) = self.range();
        let spread = i128::from(max) - i128::from(min);
        let scale = i128::from(scale.max(1));
        let fixed_point = min == 1 && i128::from(max) <= scale;

        let mut cells = [[0u64; N]; N];
        for row in 0..N {
            for col in 0..N {
                if is_center(row, col) {
                    continue;
                }
                let offset = i128::from(self.cells[row][col]) - i128::from(min);
                let w = if fixed_point {
                    offset + 1
                } else {
                    offset * scale / (spread + 1) + 1
                };
                cells[row][col] = w as u64;
            }
        }
        NormalizedWeights { cells }
    }

    /// Load a weight map, falling back to the default map if `path` does not exist.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!(path = %path.display(), "no stored weight map, starting from defaults");
            return Ok(Self::new());
        }
        let file = File::open(path)
            .with_context(|| format!("Failed to open weight map: {}", path.display()))?;
        let map: WeightMap = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse weight map: {}", path.display()))?;
        info!(path = %path.display(), "loaded weight map");
        Ok(Self::from_grid(map.cells))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("Failed to create weight map: {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)
            .context("Failed to serialize weight map")?;
        info!(path = %path.display(), "saved weight map");
        Ok(())
    }
}

impl fmt::Display for WeightMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_grid(f, &self.cells)
    }
}

/// Normalized weights used by the weighted policy. Eligible cells are >= 1.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizedWeights {
    cells: [[u64; N]; N],
}

impl NormalizedWeights {
    /// Sampling weight for `mv`. Centre cells carry no learned weight and count as 1.
    ///
    /// # Panics
    /// Panics if `mv` is off the board.
    pub fn weight(&self, mv: Move) -> u64 {
        if is_center(mv.row, mv.col) {
            return 1;
        }
        self.cells[mv.row][mv.col]
    }

    /// Equal weight for every cell.
    pub fn uniform() -> Self {
        WeightMap::new().normalized(1)
    }

    /// View the snapshot as a raw map, e.g. to normalize it again.
    pub fn to_weight_map(&self) -> WeightMap {
        let mut cells = [[0i64; N]; N];
        for row in 0..N {
            for col in 0..N {
                cells[row][col] = self.cells[row][col] as i64;
            }
        }
        WeightMap::from_grid(cells)
    }
}

impl fmt::Display for NormalizedWeights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_grid(f, &self.cells)
    }
}

fn write_grid<T: fmt::Display>(f: &mut fmt::Formatter<'_>, cells: &[[T; N]; N]) -> fmt::Result {
    for line in cells {
        let row: Vec<String> = line.iter().map(|w| format!("{w:>6}")).collect();
        writeln!(f, "[{}]", row.join(","))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{ELIGIBLE_CELLS, NORMALIZE_SCALE};

    #[test]
    fn test_default_map() {
        let map = WeightMap::new();
        assert_eq!(map.eligible().count(), ELIGIBLE_CELLS);
        assert!(map.eligible().all(|w| w == DEFAULT_WEIGHT));
        assert_eq!(map.get(Move::new(3, 3)), CENTER_SENTINEL);
        assert_eq!(map.range(), (1, 1));
    }

    #[test]
    fn test_credit_adds_per_listed_cell() {
        let mut map = WeightMap::new();
        map.credit(&[Move::new(0, 0), Move::new(0, 0), Move::new(2, 3)], 1);
        map.credit(&[Move::new(7, 7)], -1);
        assert_eq!(map.get(Move::new(0, 0)), 3);
        assert_eq!(map.get(Move::new(2, 3)), 2);
        assert_eq!(map.get(Move::new(7, 7)), 0);
        assert_eq!(map.range(), (0, 3));
    }

    #[test]
    fn test_credit_skips_center_and_off_board() {
        let mut map = WeightMap::new();
        map.credit(&[Move::new(4, 4), Move::new(8, 0), Move::new(0, 200)], 5);
        assert_eq!(map.get(Move::new(4, 4)), CENTER_SENTINEL);
        assert_eq!(map, WeightMap::new());
    }

    #[test]
    fn test_normalized_uniform_map() {
        let norm = WeightMap::new().normalized(NORMALIZE_SCALE);
        assert_eq!(norm.weight(Move::new(0, 0)), 1);
        assert_eq!(norm.weight(Move::new(7, 3)), 1);
    }

    #[test]
    fn test_normalized_small_spread_stretches_to_scale() {
        let mut map = WeightMap::new();
        map.credit(&[Move::new(0, 0)], -1);
        map.credit(&[Move::new(0, 1)], 1);
        // min 0, max 2: floor(offset * 10000 / 3) + 1
        let norm = map.normalized(NORMALIZE_SCALE);
        assert_eq!(norm.weight(Move::new(0, 0)), 1);
        assert_eq!(norm.weight(Move::new(5, 5)), 3334);
        assert_eq!(norm.weight(Move::new(0, 1)), 6667);
    }

    #[test]
    fn test_normalized_negative_weights() {
        let mut map = WeightMap::new();
        map.credit(&[Move::new(0, 0)], 4);
        map.credit(&[Move::new(0, 1)], -3);
        // min -2, max 5: floor(offset * 10000 / 8) + 1
        let norm = map.normalized(NORMALIZE_SCALE);
        assert_eq!(norm.weight(Move::new(0, 1)), 1);
        assert_eq!(norm.weight(Move::new(5, 5)), 3751);
        assert_eq!(norm.weight(Move::new(0, 0)), 8751);
    }

    #[test]
    fn test_normalized_leaves_normalized_map_alone() {
        let mut map = WeightMap::new();
        map.credit(&[Move::new(0, 0)], 41);
        map.credit(&[Move::new(6, 2)], 9_998);
        let norm = map.normalized(NORMALIZE_SCALE);
        assert_eq!(norm.to_weight_map(), map);
    }

    #[test]
    fn test_normalized_large_spread_scales() {
        let mut grid = [[0i64; N]; N];
        grid[0][0] = 100;
        grid[0][1] = 50;
        let map = WeightMap::from_grid(grid);
        let norm = map.normalized(10);
        // floor(w * 10 / 101) + 1
        assert_eq!(norm.weight(Move::new(0, 0)), 10);
        assert_eq!(norm.weight(Move::new(0, 1)), 5);
        assert_eq!(norm.weight(Move::new(7, 7)), 1);
    }

    #[test]
    fn test_normalized_is_idempotent() {
        let mut grid = [[0i64; N]; N];
        for (i, line) in grid.iter_mut().enumerate() {
            for (j, w) in line.iter_mut().enumerate() {
                *w = (i as i64 * 37 - j as i64 * 1234) * 17;
            }
        }
        let map = WeightMap::from_grid(grid);
        for scale in [1, 7, 100, NORMALIZE_SCALE] {
            let once = map.normalized(scale);
            let twice = once.to_weight_map().normalized(scale);
            assert_eq!(once, twice, "scale {scale}");
            assert!(once.to_weight_map().eligible().all(|w| w >= 1 && w <= scale));
        }
    }

    #[test]
    fn test_uniform_weights() {
        let norm = NormalizedWeights::uniform();
        assert_eq!(norm.weight(Move::new(0, 0)), 1);
        assert_eq!(norm.weight(Move::new(3, 3)), 1);
    }

    #[test]
    fn test_save_load_roundtrip() -> Result<()> {
        let dir = tempfile::TempDir::new()?;
        let path = dir.path().join("weights.json");

        let mut map = WeightMap::new();
        map.credit(&[Move::new(0, 0), Move::new(5, 2)], 9);
        map.save(&path)?;

        let loaded = WeightMap::load(&path)?;
        assert_eq!(loaded, map);
        Ok(())
    }

    #[test]
    fn test_load_missing_file_defaults() -> Result<()> {
        let dir = tempfile::TempDir::new()?;
        let loaded = WeightMap::load(dir.path().join("absent.json"))?;
        assert_eq!(loaded, WeightMap::new());
        Ok(())
    }

    #[test]
    fn test_load_corrupt_file_errors() -> Result<()> {
        let dir = tempfile::TempDir::new()?;
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "not json")?;
        assert!(WeightMap::load(&path).is_err());
        Ok(())
    }
}
