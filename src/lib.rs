//! Othello-Rust: a Reversi rules engine with a self-play weight trainer.
//!
//! The trainer plays many games with randomized policies and learns a per-cell
//! weight map: cells the winner played gain weight, cells the loser played
//! lose it. The weighted policy then prefers historically winning cells.
//!
//! ## Modules
//!
//! - [`constants`] - Board geometry and training defaults
//! - [`board`] - Cells, sides, coordinates and the 8x8 grid
//! - [`engine`] - Capture evaluation, placement, legal moves, winner, [`engine::Game`]
//! - [`weights`] - Persisted weight map and its normalized snapshot
//! - [`policy`] - Uniform and weighted random move selection
//! - [`trainer`] - Self-play trial loop
//! - [`console`] - Interactive human-vs-policy game
//! - [`config`] - Trainer configuration
//!
//! ## Example
//!
//! ```
//! use othello_rust::config::TrainerConfig;
//! use othello_rust::trainer::Trainer;
//! use othello_rust::weights::WeightMap;
//!
//! let config = TrainerConfig {
//!     trials: 10,
//!     seed: Some(1),
//!     ..TrainerConfig::default()
//! };
//! let trainer = Trainer::new(config, WeightMap::new()).unwrap();
//! let summary = trainer.run().unwrap();
//! assert_eq!(summary.trials, 10);
//! println!("{summary}");
//! ```

pub mod board;
pub mod config;
pub mod console;
pub mod constants;
pub mod engine;
pub mod error;
pub mod policy;
pub mod trainer;
pub mod weights;

pub use error::{Error, Result};
