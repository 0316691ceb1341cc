//! Self-play trainer.
//!
//! Each trial plays one complete game from the opening position. The side to
//! move asks the engine for its legal moves and its configured policy picks
//! one; a side without moves passes, and two passes in a row end the game.
//! The winner's placed cells are then credited in the weight map and the
//! loser's penalized. Draws leave the map untouched.
//!
//! Trials only share the weight map, which sits behind a mutex: a trial locks
//! it once to take its normalized snapshot and once more to credit the
//! result. With `workers > 1` trials run on scoped threads; with one worker
//! they run in order on the calling thread, so a fixed seed reproduces a run
//! exactly.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread;

use tracing::{debug, info, trace};

use crate::board::Side;
use crate::config::TrainerConfig;
use crate::engine::{Game, Outcome};
use crate::error::{Error, Result};
use crate::weights::{NormalizedWeights, WeightMap};

/// Final result of one trial.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TrialOutcome {
    pub outcome: Outcome,
    /// Black stones at the end
    pub black: usize,
    /// White stones at the end
    pub white: usize,
}

impl TrialOutcome {
    pub fn of(game: &Game) -> Self {
        let (black, white) = game.board().count_stones();
        Self {
            outcome: game.outcome(),
            black,
            white,
        }
    }
}

/// Running Black/White/Draw tally.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TrainingSummary {
    pub trials: usize,
    pub black_wins: usize,
    pub white_wins: usize,
    pub draws: usize,
}

impl TrainingSummary {
    pub fn record(&mut self, outcome: Outcome) {
        self.trials += 1;
        match outcome {
            Outcome::Win(Side::Black) => self.black_wins += 1,
            Outcome::Win(Side::White) => self.white_wins += 1,
            Outcome::Draw => self.draws += 1,
        }
    }

    pub fn merge(&mut self, other: &TrainingSummary) {
        self.trials += other.trials;
        self.black_wins += other.black_wins;
        self.white_wins += other.white_wins;
        self.draws += other.draws;
    }
}

impl fmt::Display for TrainingSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Black: {}, Draw: {}, White: {}",
            self.black_wins, self.draws, self.white_wins
        )
    }
}

/// Play `game` until both sides pass in succession.
///
/// Each side picks from its legal moves with the policy configured for it.
pub fn play_out(
    game: &mut Game,
    config: &TrainerConfig,
    weights: &NormalizedWeights,
    rng: &mut fastrand::Rng,
) -> Result<()> {
    while !game.is_over() {
        let side = game.to_move();
        let moves = game.legal_moves();
        match config.policy_for(side).select(&moves, weights, rng) {
            Some(mv) => {
                if !game.play(mv) {
                    return Err(Error::LegalMoveFailed { mv, side });
                }
            }
            None => game.pass(),
        }
    }
    Ok(())
}

/// Credit the winner's cells and penalize the loser's. Draws change nothing.
pub fn apply_outcome(weights: &mut WeightMap, game: &Game, config: &TrainerConfig) -> Outcome {
    let outcome = game.outcome();
    if let Outcome::Win(winner) = outcome {
        weights.credit(game.history(winner), config.reward);
        weights.credit(game.history(winner.opponent()), -config.penalty);
    }
    outcome
}

fn lock(weights: &Mutex<WeightMap>) -> MutexGuard<'_, WeightMap> {
    weights.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Runs self-play trials and accumulates the weight map.
pub struct Trainer {
    config: TrainerConfig,
    weights: Mutex<WeightMap>,
}

impl Trainer {
    pub fn new(config: TrainerConfig, weights: WeightMap) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            weights: Mutex::new(weights),
        })
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Copy of the current raw weight map.
    pub fn weights(&self) -> WeightMap {
        lock(&self.weights).clone()
    }

    pub fn into_weights(self) -> WeightMap {
        self.weights
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Run every configured trial and return the tally.
    pub fn run(&self) -> Result<TrainingSummary> {
        let base_seed = self.config.seed.unwrap_or_else(|| fastrand::u64(..));
        let next = &AtomicUsize::new(0);
        info!(
            trials = self.config.trials,
            workers = self.config.workers,
            base_seed,
            "starting self-play"
        );

        let summary = if self.config.workers <= 1 {
            self.worker(next, base_seed)?
        } else {
            let results: Vec<Result<TrainingSummary>> = thread::scope(|s| {
                let handles: Vec<_> = (0..self.config.workers)
                    .map(|_| s.spawn(move || self.worker(next, base_seed)))
                    .collect();
                handles
                    .into_iter()
                    .map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
                    .collect()
            });
            let mut summary = TrainingSummary::default();
            for result in results {
                summary.merge(&result?);
            }
            summary
        };

        info!(
            black = summary.black_wins,
            white = summary.white_wins,
            draws = summary.draws,
            "self-play finished"
        );
        Ok(summary)
    }

    /// Claim trial indices until all trials are taken.
    fn worker(&self, next: &AtomicUsize, base_seed: u64) -> Result<TrainingSummary> {
        let mut summary = TrainingSummary::default();
        loop {
            let index = next.fetch_add(1, Ordering::Relaxed);
            if index >= self.config.trials {
                break;
            }
            let mut rng = fastrand::Rng::with_seed(base_seed.wrapping_add(index as u64));
            let result = self.play_trial(Game::new(), &mut rng)?;
            debug!(
                trial = index,
                outcome = ?result.outcome,
                black = result.black,
                white = result.white,
                "trial finished"
            );
            summary.record(result.outcome);
        }
        Ok(summary)
    }

    /// Play one trial from `game` and fold its result into the weight map.
    pub fn play_trial(&self, mut game: Game, rng: &mut fastrand::Rng) -> Result<TrialOutcome> {
        let snapshot = lock(&self.weights).normalized(self.config.scale);
        play_out(&mut game, &self.config, &snapshot, rng)?;

        let mut weights = lock(&self.weights);
        apply_outcome(&mut weights, &game, &self.config);
        let (min, max) = weights.range();
        trace!(min, max, "weight range");

        Ok(TrialOutcome::of(&game))
    }
}
