//! Trainer configuration.
//!
//! Values come from [`TrainerConfig::default`], optionally replaced by a TOML
//! file, and finally by command-line flags in the binary.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::board::Side;
use crate::constants::{LOSS_PENALTY, N_TRIALS, NORMALIZE_SCALE, WIN_REWARD};
use crate::error::{Error, Result};
use crate::policy::PolicyKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainerConfig {
    /// Number of self-play games
    pub trials: usize,
    /// Base seed; trial `i` uses `seed + i`. Random when unset.
    pub seed: Option<u64>,
    pub black_policy: PolicyKind,
    pub white_policy: PolicyKind,
    /// Added to every cell the winner played
    pub reward: i64,
    /// Subtracted from every cell the loser played
    pub penalty: i64,
    /// Upper bound `K` of the normalized weight range
    pub scale: i64,
    /// Worker threads running trials
    pub workers: usize,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            trials: N_TRIALS,
            seed: None,
            black_policy: PolicyKind::Uniform,
            white_policy: PolicyKind::Weighted,
            reward: WIN_REWARD,
            penalty: LOSS_PENALTY,
            scale: NORMALIZE_SCALE,
            workers: 1,
        }
    }
}

impl TrainerConfig {
    /// Read a configuration from a TOML file. Missing keys keep their defaults.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            operation: format!("read config {}", path.display()),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// The file's configuration when a path is given, the defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_toml_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: TrainerConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |message: &str| -> Result<()> {
            Err(Error::InvalidConfiguration {
                message: message.to_string(),
            })
        };
        if self.trials == 0 {
            return invalid("trials must be at least 1");
        }
        if self.workers == 0 {
            return invalid("workers must be at least 1");
        }
        if self.scale <= 0 {
            return invalid("scale must be positive");
        }
        if self.reward < 0 || self.penalty < 0 {
            return invalid("reward and penalty must be non-negative");
        }
        Ok(())
    }

    pub fn policy_for(&self, side: Side) -> PolicyKind {
        match side {
            Side::Black => self.black_policy,
            Side::White => self.white_policy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = TrainerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.policy_for(Side::Black), PolicyKind::Uniform);
        assert_eq!(config.policy_for(Side::White), PolicyKind::Weighted);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = TrainerConfig::from_toml_str(
            r#"
            trials = 25
            seed = 9
            black_policy = "weighted"
            "#,
        )
        .unwrap();
        assert_eq!(config.trials, 25);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.black_policy, PolicyKind::Weighted);
        assert_eq!(config.white_policy, PolicyKind::Weighted);
        assert_eq!(config.scale, NORMALIZE_SCALE);
    }

    #[test]
    fn test_invalid_values_rejected() {
        for text in ["trials = 0", "workers = 0", "scale = 0", "penalty = -1"] {
            assert!(
                matches!(
                    TrainerConfig::from_toml_str(text),
                    Err(Error::InvalidConfiguration { .. })
                ),
                "{text} should be rejected"
            );
        }
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(matches!(
            TrainerConfig::from_toml_str("trails = 3"),
            Err(Error::ConfigParse(_))
        ));
    }

    #[test]
    fn test_load_or_default() -> anyhow::Result<()> {
        assert_eq!(TrainerConfig::load_or_default(None)?, TrainerConfig::default());

        let dir = tempfile::TempDir::new()?;
        let path = dir.path().join("othello.toml");
        std::fs::write(&path, "reward = 2\npenalty = 3\nscale = 500\n")?;
        let config = TrainerConfig::load_or_default(Some(path.as_path()))?;
        assert_eq!((config.reward, config.penalty, config.scale), (2, 3, 500));
        assert_eq!(config.trials, N_TRIALS);
        Ok(())
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            TrainerConfig::from_toml_file("/nonexistent/othello.toml"),
            Err(Error::Io { .. })
        ));
    }
}
