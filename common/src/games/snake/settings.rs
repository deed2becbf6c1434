use std::time::Duration;

use crate::config::SnakeGameConfig;
use super::types::{ControlMode, FieldSize};

pub struct SnakeSessionSettings {
    pub field_size: FieldSize,
    pub tick_interval: Duration,
    pub control_mode: ControlMode,
    pub seed: Option<u64>,
    pub max_ticks: Option<u64>,
}

impl From<&SnakeGameConfig> for SnakeSessionSettings {
    fn from(config: &SnakeGameConfig) -> Self {
        let control_mode = if config.auto_play {
            ControlMode::Ai
        } else {
            ControlMode::Human
        };

        Self {
            field_size: FieldSize::new(config.field_width as usize, config.field_height as usize),
            tick_interval: Duration::from_millis(config.tick_interval_ms.max(1) as u64),
            control_mode,
            seed: config.seed,
            max_ticks: config.max_ticks,
        }
    }
}
