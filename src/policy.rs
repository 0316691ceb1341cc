//! Move selection policies for self-play.
//!
//! Both policies draw from an explicitly passed [`fastrand::Rng`], so a game
//! seeded with the same value replays identically.

use serde::{Deserialize, Serialize};

use crate::board::Move;
use crate::weights::NormalizedWeights;

/// Which policy a side plays with.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    /// Every legal move equally likely
    #[default]
    Uniform,
    /// Legal moves weighted by the learned weight map
    Weighted,
}

impl PolicyKind {
    /// Pick a move from `moves`, or `None` if the list is empty.
    pub fn select(
        self,
        moves: &[Move],
        weights: &NormalizedWeights,
        rng: &mut fastrand::Rng,
    ) -> Option<Move> {
        match self {
            PolicyKind::Uniform => uniform_random(moves, rng),
            PolicyKind::Weighted => weighted_random(moves, weights, rng),
        }
    }
}

/// Choose a move uniformly at random.
pub fn uniform_random(moves: &[Move], rng: &mut fastrand::Rng) -> Option<Move> {
    if moves.is_empty() {
        return None;
    }
    Some(moves[rng.usize(..moves.len())])
}

/// Choose a move with probability proportional to its weight.
///
/// Builds cumulative sums in list order, draws `r` in `[0, total)` and takes
/// the first move whose cumulative sum exceeds `r`.
pub fn weighted_random(
    moves: &[Move],
    weights: &NormalizedWeights,
    rng: &mut fastrand::Rng,
) -> Option<Move> {
    if moves.is_empty() {
        return None;
    }

    let cumulative: Vec<u64> = moves
        .iter()
        .scan(0u64, |total, &mv| {
            *total = total.saturating_add(weights.weight(mv));
            Some(*total)
        })
        .collect();

    let total = *cumulative.last()?;
    if total == 0 {
        return uniform_random(moves, rng);
    }

    let draw = rng.u64(..total);
    let idx = cumulative
        .iter()
        .position(|&sum| sum > draw)
        .unwrap_or(moves.len() - 1);
    Some(moves[idx])
}
