//! Engine tuning, gathered in one place.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    GridPos, BASE_FALL_INTERVAL_SECS, FALL_SPEEDUP_PER_LINE_SECS, GRID_HEIGHT, GRID_WIDTH,
    HARD_DROP_REPEAT_SECS, LOCK_DELAY_SECS, MIN_FALL_INTERVAL_SECS, MOVE_REPEAT_SECS,
    ROTATE_REPEAT_SECS, SOFT_DROP_REPEAT_SECS, SPAWN_ORIGIN,
};

/// Reset intervals for the action gate channels (seconds)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateIntervals {
    pub horizontal: f32,
    pub down: f32,
    pub rotate: f32,
    pub hard_drop: f32,
}

impl Default for GateIntervals {
    fn default() -> Self {
        Self {
            horizontal: MOVE_REPEAT_SECS,
            down: SOFT_DROP_REPEAT_SECS,
            rotate: ROTATE_REPEAT_SECS,
            hard_drop: HARD_DROP_REPEAT_SECS,
        }
    }
}

/// Every tuning value the engine reads, passed in at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub width: u16,
    pub height: u16,
    /// Row occupied by the ground; `None` means the bottom row.
    pub floor_row: Option<u16>,
    pub spawn_origin: GridPos,
    pub base_fall_interval: f32,
    pub fall_speedup_per_line: f32,
    pub min_fall_interval: f32,
    pub lock_delay: f32,
    pub gate: GateIntervals,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: GRID_WIDTH,
            height: GRID_HEIGHT,
            floor_row: None,
            spawn_origin: SPAWN_ORIGIN,
            base_fall_interval: BASE_FALL_INTERVAL_SECS,
            fall_speedup_per_line: FALL_SPEEDUP_PER_LINE_SECS,
            min_fall_interval: MIN_FALL_INTERVAL_SECS,
            lock_delay: LOCK_DELAY_SECS,
            gate: GateIntervals::default(),
        }
    }
}

/// Rejected configuration, with a human-readable reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(pub String);

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid engine config: {}", self.0)
    }
}

impl std::error::Error for ConfigError {}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

impl EngineConfig {
    /// Resolved floor row
    pub fn floor_row(&self) -> u16 {
        self.floor_row
            .unwrap_or_else(|| self.height.saturating_sub(1))
    }

    /// Defaults overridden by `TETR_*` environment variables.
    ///
    /// Missing or unparsable variables keep the default:
    /// - `TETR_WIDTH`, `TETR_HEIGHT`, `TETR_FLOOR_ROW`
    /// - `TETR_SPAWN_X`, `TETR_SPAWN_Y`
    /// - `TETR_FALL_INTERVAL`, `TETR_FALL_SPEEDUP`, `TETR_MIN_FALL_INTERVAL`
    /// - `TETR_LOCK_DELAY`
    /// - `TETR_GATE_HORIZONTAL`, `TETR_GATE_DOWN`, `TETR_GATE_ROTATE`, `TETR_GATE_HARD_DROP`
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Apply `TETR_*` overrides on top of `self`
    pub fn apply_env(&mut self) {
        if let Some(v) = env_parse("TETR_WIDTH") {
            self.width = v;
        }
        if let Some(v) = env_parse("TETR_HEIGHT") {
            self.height = v;
        }
        if let Some(v) = env_parse("TETR_FLOOR_ROW") {
            self.floor_row = Some(v);
        }
        if let Some(v) = env_parse("TETR_SPAWN_X") {
            self.spawn_origin.x = v;
        }
        if let Some(v) = env_parse("TETR_SPAWN_Y") {
            self.spawn_origin.y = v;
        }
        if let Some(v) = env_parse("TETR_FALL_INTERVAL") {
            self.base_fall_interval = v;
        }
        if let Some(v) = env_parse("TETR_FALL_SPEEDUP") {
            self.fall_speedup_per_line = v;
        }
        if let Some(v) = env_parse("TETR_MIN_FALL_INTERVAL") {
            self.min_fall_interval = v;
        }
        if let Some(v) = env_parse("TETR_LOCK_DELAY") {
            self.lock_delay = v;
        }
        if let Some(v) = env_parse("TETR_GATE_HORIZONTAL") {
            self.gate.horizontal = v;
        }
        if let Some(v) = env_parse("TETR_GATE_DOWN") {
            self.gate.down = v;
        }
        if let Some(v) = env_parse("TETR_GATE_ROTATE") {
            self.gate.rotate = v;
        }
        if let Some(v) = env_parse("TETR_GATE_HARD_DROP") {
            self.gate.hard_drop = v;
        }
    }

    /// Reject geometry and timings the engine cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < 4 {
            return Err(ConfigError(format!("width {} is narrower than a piece", self.width)));
        }
        if self.height < 5 {
            return Err(ConfigError(format!("height {} leaves no room above the floor", self.height)));
        }
        let floor = self.floor_row();
        if floor < 4 || floor >= self.height {
            return Err(ConfigError(format!(
                "floor row {} must be in 4..{}",
                floor, self.height
            )));
        }
        let spawn = self.spawn_origin;
        if spawn.x < -3 || spawn.x >= self.width as i32 || spawn.y >= floor as i32 {
            return Err(ConfigError(format!(
                "spawn origin ({}, {}) is outside the well",
                spawn.x, spawn.y
            )));
        }
        let timings = [
            ("base_fall_interval", self.base_fall_interval),
            ("min_fall_interval", self.min_fall_interval),
            ("gate.horizontal", self.gate.horizontal),
            ("gate.down", self.gate.down),
            ("gate.rotate", self.gate.rotate),
            ("gate.hard_drop", self.gate.hard_drop),
        ];
        for (name, value) in timings {
            if !(value > 0.0) {
                return Err(ConfigError(format!("{} must be positive, got {}", name, value)));
            }
        }
        if !(self.fall_speedup_per_line >= 0.0) || !(self.lock_delay >= 0.0) {
            return Err(ConfigError("speed-up and lock delay must not be negative".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_observed_configuration() {
        let c = EngineConfig::default();
        assert_eq!((c.width, c.height), (12, 33));
        assert_eq!(c.floor_row(), 32);
        assert_eq!(c.spawn_origin, GridPos::new(1, 1));
        assert!(c.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_geometry() {
        let narrow = EngineConfig {
            width: 3,
            ..EngineConfig::default()
        };
        assert!(narrow.validate().is_err());

        let floor_outside = EngineConfig {
            floor_row: Some(40),
            ..EngineConfig::default()
        };
        assert!(floor_outside.validate().is_err());

        let zero_gate = EngineConfig {
            gate: GateIntervals {
                rotate: 0.0,
                ..GateIntervals::default()
            },
            ..EngineConfig::default()
        };
        let err = zero_gate.validate().unwrap_err();
        assert!(err.to_string().contains("gate.rotate"));
    }

    #[test]
    fn validate_rejects_nan_timings() {
        let nan_lock = EngineConfig {
            lock_delay: f32::NAN,
            ..EngineConfig::default()
        };
        assert!(nan_lock.validate().is_err());

        let nan_speedup = EngineConfig {
            fall_speedup_per_line: f32::NAN,
            ..EngineConfig::default()
        };
        assert!(nan_speedup.validate().is_err());

        let no_delay = EngineConfig {
            lock_delay: 0.0,
            fall_speedup_per_line: 0.0,
            ..EngineConfig::default()
        };
        assert!(no_delay.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let c: EngineConfig =
            serde_json::from_str(r#"{"width": 10, "gate": {"rotate": 0.5}}"#).unwrap();
        assert_eq!(c.width, 10);
        assert_eq!(c.height, GRID_HEIGHT);
        assert_eq!(c.gate.rotate, 0.5);
        assert_eq!(c.gate.horizontal, MOVE_REPEAT_SECS);
    }
}
