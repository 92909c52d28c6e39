//! Typed configuration for board generation, awards and the game loop.
//!
//! Every field has a default matching the standard game, so an empty JSON
//! object is a valid configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config JSON: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    #[error("a game needs 2-4 players, got {0}")]
    InvalidPlayerCount(usize),

    #[error("{0} must be at least 1")]
    ZeroRetryCap(&'static str),
}

/// Board generation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Sweeps the dice repair may run before generation fails
    pub dice_repair_attempts: usize,
    /// Sweeps the harbor repair may run before generation fails
    pub harbor_repair_attempts: usize,
    /// Keep the last harbor placement instead of failing when the repair
    /// runs out of attempts
    pub relaxed_harbor_fallback: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            dice_repair_attempts: 64,
            harbor_repair_attempts: 1000,
            relaxed_harbor_fallback: false,
        }
    }
}

/// Qualifying thresholds and the bonus each award is worth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AwardRules {
    pub longest_road_min: u32,
    pub largest_army_min: u32,
    pub most_harbors_min: u32,
    pub bonus_points: u32,
}

impl Default for AwardRules {
    fn default() -> Self {
        Self {
            longest_road_min: 5,
            largest_army_min: 3,
            most_harbors_min: 3,
            bonus_points: 2,
        }
    }
}

/// Top-level game configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// One name per seat; the length sets the player count
    pub player_names: Vec<String>,
    /// Seed for every random decision; fresh entropy when absent
    pub seed: Option<u64>,
    pub victory_points_to_win: u32,
    /// Safety valve for `GameState::play_turn` with a misbehaving policy
    pub max_actions_per_turn: usize,
    pub board: BoardConfig,
    pub awards: AwardRules,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_names: ["red", "green", "blue", "yellow"]
                .into_iter()
                .map(String::from)
                .collect(),
            seed: None,
            victory_points_to_win: 10,
            max_actions_per_turn: 64,
            board: BoardConfig::default(),
            awards: AwardRules::default(),
        }
    }
}

impl GameConfig {
    /// Default configuration with a fixed seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Parse and validate configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let players = self.player_names.len();
        if !(2..=4).contains(&players) {
            return Err(ConfigError::InvalidPlayerCount(players));
        }
        if self.board.dice_repair_attempts == 0 {
            return Err(ConfigError::ZeroRetryCap("dice_repair_attempts"));
        }
        if self.board.harbor_repair_attempts == 0 {
            return Err(ConfigError::ZeroRetryCap("harbor_repair_attempts"));
        }
        if self.max_actions_per_turn == 0 {
            return Err(ConfigError::ZeroRetryCap("max_actions_per_turn"));
        }
        Ok(())
    }
}
