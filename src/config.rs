//! Game configuration, embedded at build time from `game-config.json`.

use serde::Deserialize;

use crate::time::ms_to_ticks;

const EMBEDDED_CONFIG: &str = include_str!("game-config.json");

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid game config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("ticks_per_second must be between 1 and 1000, got {0}")]
    TickRate(u32),
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    /// Enables debug-level logging.
    pub debug: bool,
    pub ticks_per_second: u32,
    pub click_cooldown_ms: u32,
    pub toast_ms: u32,
    pub autosave_interval_ms: u32,
    pub storage_key: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            debug: false,
            ticks_per_second: 40,
            click_cooldown_ms: 75,
            toast_ms: 3000,
            autosave_interval_ms: 5000,
            storage_key: "userData".to_string(),
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        if config.ticks_per_second == 0 || config.ticks_per_second > 1000 {
            return Err(ConfigError::TickRate(config.ticks_per_second));
        }
        Ok(config)
    }

    /// The embedded config, or defaults if it does not parse.
    pub fn load() -> Self {
        match Self::from_json(EMBEDDED_CONFIG) {
            Ok(c) => c,
            Err(e) => {
                log::error!("{e}; falling back to defaults");
                Self::default()
            }
        }
    }

    pub fn ticks(&self, ms: u32) -> u32 {
        ms_to_ticks(ms, self.ticks_per_second)
    }

    pub fn cooldown_ticks(&self) -> u32 {
        self.ticks(self.click_cooldown_ms)
    }

    pub fn toast_ticks(&self) -> u32 {
        self.ticks(self.toast_ms)
    }

    pub fn autosave_ticks(&self) -> u32 {
        self.ticks(self.autosave_interval_ms)
    }
}
