use std::path::Path;

use tracing::warn;

use crate::ai::{Agent, HeuristicAgent, NegamaxAgent, RandomAgent, SearchConfig, MAX_DEPTH};
use crate::error::ConfigError;

/// Named search depths offered to players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn depth(self) -> u8 {
        match self {
            Difficulty::Easy => 3,
            Difficulty::Medium => 5,
            Difficulty::Hard => 7,
        }
    }
}

/// Move policy backing a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PlayerKind {
    Negamax,
    Heuristic,
    Random,
}

/// Configuration for one side.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub kind: PlayerKind,
    /// Overrides `depth` when set.
    pub difficulty: Option<Difficulty>,
    pub depth: u8,
    pub alpha_beta: bool,
    pub positional: bool,
    pub random_ties: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        let search = SearchConfig::default();
        PlayerConfig {
            kind: PlayerKind::Negamax,
            difficulty: None,
            depth: search.depth,
            alpha_beta: search.alpha_beta,
            positional: search.positional,
            random_ties: search.random_ties,
        }
    }
}

impl PlayerConfig {
    pub fn effective_depth(&self) -> u8 {
        self.difficulty.map_or(self.depth, Difficulty::depth)
    }

    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            depth: self.effective_depth(),
            alpha_beta: self.alpha_beta,
            positional: self.positional,
            random_ties: self.random_ties,
        }
    }

    /// Build the agent. With a seed every random choice is reproducible;
    /// without one, randomness comes from the OS.
    pub fn build_agent(&self, seed: Option<u64>) -> Result<Box<dyn Agent>, ConfigError> {
        let agent: Box<dyn Agent> = match (self.kind, seed) {
            (PlayerKind::Negamax, Some(seed)) => {
                Box::new(NegamaxAgent::seeded(self.search_config(), seed)?)
            }
            (PlayerKind::Negamax, None) => Box::new(NegamaxAgent::new(self.search_config())?),
            (PlayerKind::Heuristic, Some(seed)) => Box::new(HeuristicAgent::seeded(seed)),
            (PlayerKind::Heuristic, None) => Box::new(HeuristicAgent::new()),
            (PlayerKind::Random, Some(seed)) => Box::new(RandomAgent::seeded(seed)),
            (PlayerKind::Random, None) => Box::new(RandomAgent::new()),
        };
        Ok(agent)
    }
}

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base seed for all random choices; per-game, per-side seeds derive from it.
    pub seed: Option<u64>,
    pub games: usize,
    /// Swap who opens on every other game of a series.
    pub alternate_first: bool,
    pub player_one: PlayerConfig,
    pub player_two: PlayerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            seed: None,
            games: 1,
            alternate_first: true,
            player_one: PlayerConfig::default(),
            player_two: PlayerConfig {
                kind: PlayerKind::Heuristic,
                ..PlayerConfig::default()
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.games == 0 {
            return Err(ConfigError::Validation("games must be > 0".into()));
        }
        for (name, player) in [("player_one", &self.player_one), ("player_two", &self.player_two)] {
            if player.kind != PlayerKind::Negamax {
                continue;
            }
            let depth = player.effective_depth();
            if depth == 0 || depth > MAX_DEPTH {
                return Err(ConfigError::Validation(format!(
                    "{name}.depth must be in 1..={MAX_DEPTH}, got {depth}"
                )));
            }
        }
        Ok(())
    }

    /// Seed for one side of one game, if a base seed is configured.
    pub fn seed_for(&self, game: usize, side: usize) -> Option<u64> {
        self.seed
            .map(|seed| seed.wrapping_add((game as u64).wrapping_mul(2)).wrapping_add(side as u64))
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> Result<String, ConfigError> {
        toml::to_string_pretty(&AppConfig::default())
            .map_err(|e| ConfigError::Validation(format!("cannot serialize defaults: {e}")))
    }
}
