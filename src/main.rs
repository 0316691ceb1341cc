//! Othello-Rust: Reversi self-play trainer.
//!
//! ## Usage
//!
//! - `othello-rust` - Run self-play training with the defaults
//! - `othello-rust train --trials 5000 --seed 1` - Train and update the weight map
//! - `othello-rust play` - Play Black against the weighted policy
//! - `othello-rust weights` - Show the stored weight map

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use othello_rust::board::Side;
use othello_rust::config::TrainerConfig;
use othello_rust::console::{ConsoleGame, SessionEnd};
use othello_rust::constants::DEFAULT_WEIGHTS_FILE;
use othello_rust::policy::PolicyKind;
use othello_rust::trainer::{Trainer, apply_outcome};
use othello_rust::weights::WeightMap;

/// Othello-Rust: Reversi engine with a self-play weight trainer
#[derive(Parser)]
#[command(name = "othello-rust")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Default log level when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run self-play trials and update the weight map
    Train(TrainArgs),
    /// Play Black against the computer
    Play(PlayArgs),
    /// Print the stored weight map and its normalized view
    Weights {
        #[arg(long, default_value = DEFAULT_WEIGHTS_FILE)]
        weights: PathBuf,
    },
}

#[derive(Args, Default)]
struct TrainArgs {
    /// TOML file with trainer settings
    #[arg(long)]
    config: Option<PathBuf>,
    /// Weight map file (created if missing)
    #[arg(long, default_value = DEFAULT_WEIGHTS_FILE)]
    weights: PathBuf,
    #[arg(long)]
    trials: Option<usize>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    workers: Option<usize>,
    /// Policy for Black
    #[arg(long, value_enum)]
    black: Option<PolicyKind>,
    /// Policy for White
    #[arg(long, value_enum)]
    white: Option<PolicyKind>,
}

#[derive(Args)]
struct PlayArgs {
    /// TOML file with reward, penalty and scale for `--learn`
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value = DEFAULT_WEIGHTS_FILE)]
    weights: PathBuf,
    /// Policy for the computer (White)
    #[arg(long, value_enum, default_value = "weighted")]
    policy: PolicyKind,
    #[arg(long)]
    seed: Option<u64>,
    /// Credit the finished game into the weight map and save it
    #[arg(long)]
    learn: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .context("Invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Some(Commands::Train(args)) => run_train(args),
        Some(Commands::Play(args)) => run_play(args),
        Some(Commands::Weights { weights }) => run_weights(weights),
        None => run_train(TrainArgs {
            weights: PathBuf::from(DEFAULT_WEIGHTS_FILE),
            ..TrainArgs::default()
        }),
    }
}

fn load_config(path: Option<&Path>) -> Result<TrainerConfig> {
    let shown = path.map(|p| p.display().to_string()).unwrap_or_default();
    TrainerConfig::load_or_default(path).with_context(|| format!("Failed to load config: {shown}"))
}

fn run_train(args: TrainArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(trials) = args.trials {
        config.trials = trials;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(workers) = args.workers {
        config.workers = workers;
    }
    if let Some(policy) = args.black {
        config.black_policy = policy;
    }
    if let Some(policy) = args.white {
        config.white_policy = policy;
    }

    let weights = WeightMap::load(&args.weights)?;
    let trainer = Trainer::new(config, weights).context("Invalid trainer configuration")?;
    let summary = trainer.run()?;

    let weights = trainer.into_weights();
    weights.save(&args.weights)?;

    println!("{summary}");
    Ok(())
}

fn run_play(args: PlayArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let mut weights = WeightMap::load(&args.weights)?;
    let rng = match args.seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    };

    let mut session = ConsoleGame::new(
        Side::Black,
        args.policy,
        weights.normalized(config.scale),
        rng,
    );
    let stdin = io::stdin();
    let end = session.run(stdin.lock(), io::stdout())?;

    if args.learn && matches!(end, SessionEnd::Finished(_)) {
        apply_outcome(&mut weights, session.game(), &config);
        weights.save(&args.weights)?;
    }
    Ok(())
}

fn run_weights(path: PathBuf) -> Result<()> {
    let config = TrainerConfig::default();
    let weights = WeightMap::load(&path)?;
    let (min, max) = weights.range();
    println!("Raw weights ({max} / {min}):");
    print!("{weights}");
    println!("Normalized (scale {}):", config.scale);
    print!("{}", weights.normalized(config.scale));
    Ok(())
}
