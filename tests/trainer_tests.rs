//! Integration tests for the self-play trainer and the weight map.

use othello_rust::board::{Board, Move, Side};
use othello_rust::config::TrainerConfig;
use othello_rust::constants::{CENTER, NORMALIZE_SCALE};
use othello_rust::engine::{Game, Outcome};
use othello_rust::trainer::Trainer;
use othello_rust::weights::WeightMap;

// =============================================================================
// Helper functions
// =============================================================================

fn seeded(trials: usize, seed: u64) -> TrainerConfig {
    TrainerConfig {
        trials,
        seed: Some(seed),
        ..TrainerConfig::default()
    }
}

fn board(s: &str) -> Board {
    s.parse().expect("valid board diagram")
}

// =============================================================================
// Single trials from fixed positions
// =============================================================================

#[test]
fn test_trial_without_moves_is_immediate_draw() {
    let trainer = Trainer::new(seeded(1, 0), WeightMap::new()).unwrap();
    let game = Game::from_position(
        board(
            "
            X......O
            ........
            ........
            ........
            ........
            ........
            ........
            O......X",
        ),
        Side::Black,
    );
    let mut rng = fastrand::Rng::with_seed(0);
    let result = trainer.play_trial(game, &mut rng).unwrap();
    assert_eq!(result.outcome, Outcome::Draw);
    assert_eq!((result.black, result.white), (2, 2));
    assert_eq!(trainer.weights(), WeightMap::new());
}

#[test]
fn test_trial_credits_winning_cells() {
    let config = TrainerConfig {
        reward: 3,
        ..seeded(1, 0)
    };
    let trainer = Trainer::new(config, WeightMap::new()).unwrap();
    // Black's only move is 1c; afterwards neither side can move.
    let game = Game::from_position(
        board(
            "
            XO......
            ........
            ........
            ........
            ........
            ........
            ........
            ........",
        ),
        Side::Black,
    );
    let mut rng = fastrand::Rng::with_seed(0);
    let result = trainer.play_trial(game, &mut rng).unwrap();
    assert_eq!(result.outcome, Outcome::Win(Side::Black));

    let weights = trainer.weights();
    assert_eq!(weights.get(Move::new(0, 2)), 4);
    let changed = weights.eligible().filter(|&w| w != 1).count();
    assert_eq!(changed, 1);
}

// =============================================================================
// Full training runs
// =============================================================================

#[test]
fn test_training_updates_weights_and_tallies() {
    let trainer = Trainer::new(seeded(50, 2024), WeightMap::new()).unwrap();
    let summary = trainer.run().unwrap();
    assert_eq!(summary.trials, 50);
    assert_eq!(summary.black_wins + summary.white_wins + summary.draws, 50);

    let weights = trainer.into_weights();
    if summary.draws < 50 {
        assert_ne!(weights, WeightMap::new());
    }
    for (r, c) in CENTER {
        assert_eq!(weights.get(Move::new(r, c)), 0);
    }
}

#[test]
fn test_trained_weights_normalize_to_positive_idempotent_map() {
    let trainer = Trainer::new(seeded(100, 8), WeightMap::new()).unwrap();
    trainer.run().unwrap();
    let weights = trainer.into_weights();

    let once = weights.normalized(NORMALIZE_SCALE);
    let twice = once.to_weight_map().normalized(NORMALIZE_SCALE);
    assert_eq!(once, twice);
    for r in 0..8 {
        for c in 0..8 {
            assert!(once.weight(Move::new(r, c)) >= 1);
        }
    }
}

#[test]
fn test_same_seed_reproduces_training() {
    let run = |seed| {
        let trainer = Trainer::new(seeded(30, seed), WeightMap::new()).unwrap();
        let summary = trainer.run().unwrap();
        (summary, trainer.into_weights())
    };
    assert_eq!(run(99), run(99));
}

#[test]
fn test_weights_persist_between_runs() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let path = dir.path().join("weights.json");

    let first = Trainer::new(seeded(20, 1), WeightMap::load(&path)?)?;
    first.run()?;
    let after_first = first.into_weights();
    after_first.save(&path)?;

    let reloaded = WeightMap::load(&path)?;
    assert_eq!(reloaded, after_first);

    let second = Trainer::new(seeded(20, 2), reloaded)?;
    second.run()?;
    second.into_weights().save(&path)?;
    assert!(WeightMap::load(&path).is_ok());
    Ok(())
}
