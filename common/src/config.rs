use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::games::snake::{DEFAULT_FOOD_PLACEMENT_ATTEMPTS, DEFAULT_TICK_INTERVAL, SnakeSessionSettings};
use crate::storage::{ConfigManager, FileContentProvider, Validate, YamlConfigSerializer};

pub const CONFIG_FILE_NAME: &str = "rainbow_snake_config.yaml";
const DEFAULT_HIGH_SCORE_FILE: &str = "rainbow_snake_high_score.yaml";

pub fn get_config_manager(
    path: Option<PathBuf>,
) -> ConfigManager<FileContentProvider, GameConfig, YamlConfigSerializer> {
    ConfigManager::from_yaml_file(path.unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME)))
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Clone)]
pub struct GameConfig {
    pub tick_interval_ms: u32,
    #[serde(default = "default_food_placement_attempts")]
    pub food_placement_attempts: u32,
    pub high_score_file: String,
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_food_placement_attempts() -> u32 {
    DEFAULT_FOOD_PLACEMENT_ATTEMPTS as u32
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL.as_millis() as u32,
            food_placement_attempts: default_food_placement_attempts(),
            high_score_file: DEFAULT_HIGH_SCORE_FILE.to_string(),
            seed: None,
        }
    }
}

impl Validate for GameConfig {
    fn validate(&self) -> Result<(), String> {
        if !(50..=5000).contains(&self.tick_interval_ms) {
            return Err("Tick interval must be between 50ms and 5000ms".to_string());
        }
        if !(1..=10_000).contains(&self.food_placement_attempts) {
            return Err("Food placement attempts must be between 1 and 10000".to_string());
        }
        if self.high_score_file.trim().is_empty() {
            return Err("High score file must not be empty".to_string());
        }
        Ok(())
    }
}

impl From<&GameConfig> for SnakeSessionSettings {
    fn from(config: &GameConfig) -> Self {
        Self {
            tick_interval: Duration::from_millis(config.tick_interval_ms as u64),
            food_placement_attempts: config.food_placement_attempts as usize,
            seed: config.seed,
            autopilot: false,
        }
    }
}
