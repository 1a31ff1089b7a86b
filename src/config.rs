// Configuration module for reading Agents.toml
// Every tunable constant of both engines lives here

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    pub reversi: ReversiConfig,
    pub pacman: PacmanConfig,
    pub debug: DebugConfig,
}

/// Reversi search and evaluation constants
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ReversiConfig {
    pub search_depth: u32,
    pub search_width: usize,

    pub stable_disc_weight: i32,
    pub endgame_weight: i32,

    // Mobility weight by board size
    pub mobility_weight_8: i32,
    pub mobility_weight_10: i32,
    pub mobility_weight_default: i32,

    // Terminal board weights
    pub win_score: i32,
    pub loss_score: i32,
}

impl ReversiConfig {
    /// Mobility weight for a board of side `size`
    pub fn mobility_weight_for(&self, size: usize) -> i32 {
        match size {
            8 => self.mobility_weight_8,
            10 => self.mobility_weight_10,
            _ => self.mobility_weight_default,
        }
    }
}

/// Pac-Man scoring and safety constants
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PacmanConfig {
    // BFS target scores
    pub power_pellet_value: i32,
    pub power_pellet_decay: i32,
    pub ghost_value: i32,
    pub opponent_value: i32,
    pub pellet_value: i32,
    pub pellet_decay: i32,
    pub ghost_distance_weight: i32,
    pub opponent_danger_radius: i32,
    pub opponent_proximity_penalty: i32,

    // Safety test
    pub alert_radius: i32,
    pub clustered_alert_radius: i32,
    pub ghost_cluster_distance: i32,
    pub opponent_alert_radius: i32,

    // Fallback move scorer
    pub fallback_pellet_value: i32,
    pub fallback_pellet_decay: i32,
    pub fallback_ghost_distance_weight: i32,
    pub fallback_opponent_distance_weight: i32,
    pub pellet_cell_bonus: i32,
    pub power_pellet_cell_bonus: i32,

    // Dead-end schedule
    pub dead_end_empty_penalty: i32,
    pub dead_end_pellet_penalty: i32,
    pub dead_end_pellet_relief: i32,
    pub dead_end_power_pellet_bonus: i32,
    pub dead_end_last_pellets_bonus: i32,

    // Empowered play
    pub chase_value: f64,
    pub refill_threshold: i32,
    pub refill_steps_per_turn: i32,
}

/// Decision log configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Agents.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        toml::from_str(&contents).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Loads default configuration from Agents.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Agents.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Agents.toml
    pub fn default_hardcoded() -> Self {
        Config {
            reversi: ReversiConfig {
                search_depth: 6,
                search_width: 5,
                stable_disc_weight: 10,
                endgame_weight: 2,
                mobility_weight_8: 15,
                mobility_weight_10: 12,
                mobility_weight_default: 10,
                win_score: 1_000_000,
                loss_score: -100_000,
            },
            pacman: PacmanConfig {
                power_pellet_value: 1000,
                power_pellet_decay: 2,
                ghost_value: 800,
                opponent_value: 700,
                pellet_value: 500,
                pellet_decay: 3,
                ghost_distance_weight: 10,
                opponent_danger_radius: 5,
                opponent_proximity_penalty: 100,
                alert_radius: 1,
                clustered_alert_radius: 2,
                ghost_cluster_distance: 4,
                opponent_alert_radius: 1,
                fallback_pellet_value: 1000,
                fallback_pellet_decay: 10,
                fallback_ghost_distance_weight: 10,
                fallback_opponent_distance_weight: 5,
                pellet_cell_bonus: 50,
                power_pellet_cell_bonus: 100,
                dead_end_empty_penalty: 800,
                dead_end_pellet_penalty: 500,
                dead_end_pellet_relief: 20,
                dead_end_power_pellet_bonus: 50,
                dead_end_last_pellets_bonus: 100,
                chase_value: 100.0,
                refill_threshold: 5,
                refill_steps_per_turn: 2,
            },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "decisions.jsonl".to_string(),
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            log::warn!(
                "Could not load Agents.toml ({}), using hardcoded defaults",
                e
            );
            Self::default_hardcoded()
        })
    }
}
