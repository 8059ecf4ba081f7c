//! Configuration types for agents and training runs.

use std::{fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};

use crate::{Error, Result, tictactoe::Player};

fn check_probability(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidConfiguration {
            message: format!("{name} must be within [0, 1], got {value}"),
        })
    }
}

/// Configuration for creating an [`Agent`](crate::agent::Agent).
///
/// # Examples
///
/// ```
/// use td_tictactoe::app::AgentConfig;
/// use td_tictactoe::tictactoe::Player;
///
/// let config = AgentConfig::new(Player::O)
///     .with_epsilon(0.1)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Symbol the agent plays
    pub player: Player,
    /// Exploration rate ε
    pub epsilon: f64,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl AgentConfig {
    /// Greedy (ε = 0), unseeded agent for `player`.
    pub fn new(player: Player) -> Self {
        Self {
            player,
            epsilon: 0.0,
            seed: None,
        }
    }

    /// Set the exploration rate.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_probability("epsilon", self.epsilon)
    }
}

/// Self-play training configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Number of self-play games
    pub episodes: usize,

    /// Step size α of the TD backup
    pub learning_rate: f64,

    /// Exploration rate of both training agents
    pub epsilon: f64,

    /// Random seed; the second agent uses `seed + 1`
    pub seed: Option<u64>,

    /// Skip backups across moves that were chosen by exploration
    pub skip_exploratory_backups: bool,

    /// Episodes between progress log lines (0 disables them)
    pub log_interval: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 100_000,
            learning_rate: 0.1,
            epsilon: 0.1,
            seed: None,
            skip_exploratory_backups: false,
            log_interval: 500,
        }
    }
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.episodes == 0 {
            return Err(Error::InvalidConfiguration {
                message: "episodes must be at least 1".to_string(),
            });
        }
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "learning_rate must be within (0, 1], got {}",
                    self.learning_rate
                ),
            });
        }
        check_probability("epsilon", self.epsilon)
    }

    /// Agent configurations for the first (X) and second (O) mover.
    pub fn agent_configs(&self) -> (AgentConfig, AgentConfig) {
        let mut first = AgentConfig::new(Player::X).with_epsilon(self.epsilon);
        let mut second = AgentConfig::new(Player::O).with_epsilon(self.epsilon);
        if let Some(seed) = self.seed {
            first = first.with_seed(seed);
            second = second.with_seed(seed.wrapping_add(1));
        }
        (first, second)
    }

    /// Load a configuration from a JSON file; missing fields take defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open config {}", path.display()),
            source,
        })?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create config {}", path.display()),
            source,
        })?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(TrainingConfig::default().validate().is_ok());
        assert!(AgentConfig::new(Player::X).validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_parameters() {
        let config = TrainingConfig {
            learning_rate: 0.0,
            ..TrainingConfig::default()
        };
        assert!(config.validate().is_err());

        let config = TrainingConfig {
            epsilon: 1.5,
            ..TrainingConfig::default()
        };
        assert!(config.validate().is_err());

        assert!(AgentConfig::new(Player::O).with_epsilon(-0.1).validate().is_err());
    }

    #[test]
    fn agent_configs_derive_distinct_seeds() {
        let config = TrainingConfig {
            seed: Some(7),
            ..TrainingConfig::default()
        };
        let (first, second) = config.agent_configs();
        assert_eq!(first.player, Player::X);
        assert_eq!(second.player, Player::O);
        assert_eq!(first.seed, Some(7));
        assert_eq!(second.seed, Some(8));
        assert_eq!(first.epsilon, config.epsilon);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("training.json");
        std::fs::write(&path, r#"{ "episodes": 250, "seed": 11 }"#).unwrap();

        let config = TrainingConfig::load(&path).unwrap();
        assert_eq!(config.episodes, 250);
        assert_eq!(config.seed, Some(11));
        assert_eq!(config.learning_rate, TrainingConfig::default().learning_rate);
    }

    #[test]
    fn saved_config_loads_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("training.json");
        let config = TrainingConfig {
            episodes: 1_200,
            learning_rate: 0.25,
            seed: Some(4),
            skip_exploratory_backups: true,
            ..TrainingConfig::default()
        };

        config.save(&path).unwrap();
        assert_eq!(TrainingConfig::load(&path).unwrap(), config);
    }
}
