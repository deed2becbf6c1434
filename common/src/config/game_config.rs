use serde::{Deserialize, Serialize};

use super::Validate;

pub const MIN_FIELD_SIZE: u32 = 5;
pub const MAX_FIELD_SIZE: u32 = 100;
pub const MAX_TICK_INTERVAL_MS: u32 = 5000;

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct SnakeGameConfig {
    pub field_width: u32,
    pub field_height: u32,
    pub tick_interval_ms: u32,
    pub auto_play: bool,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub max_ticks: Option<u64>,
}

impl Validate for SnakeGameConfig {
    fn validate(&self) -> Result<(), String> {
        if self.field_width < MIN_FIELD_SIZE || self.field_height < MIN_FIELD_SIZE {
            return Err(format!(
                "field dimensions must be at least {}x{}",
                MIN_FIELD_SIZE, MIN_FIELD_SIZE
            ));
        }
        if self.field_width > MAX_FIELD_SIZE || self.field_height > MAX_FIELD_SIZE {
            return Err(format!(
                "field dimensions must not exceed {}x{}",
                MAX_FIELD_SIZE, MAX_FIELD_SIZE
            ));
        }
        if self.tick_interval_ms == 0 {
            return Err("tick_interval_ms must be greater than 0".to_string());
        }
        if self.tick_interval_ms > MAX_TICK_INTERVAL_MS {
            return Err(format!("tick_interval_ms must not exceed {}", MAX_TICK_INTERVAL_MS));
        }
        if self.max_ticks == Some(0) {
            return Err("max_ticks must be greater than 0 when set".to_string());
        }
        Ok(())
    }
}

impl Default for SnakeGameConfig {
    fn default() -> Self {
        // 600x400 px window with 20 px cells
        Self {
            field_width: 30,
            field_height: 20,
            tick_interval_ms: 100,
            auto_play: true,
            seed: None,
            max_ticks: None,
        }
    }
}
