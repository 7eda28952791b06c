//! Configuration layer: tuning values, input scripts and the file loader
//! shared with level definitions.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::engine::input::Key;

/// Configuration errors.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error in {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Read a RON or TOML file, chosen by extension.
pub fn load_file<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    let parse_err = |message: String| ConfigError::Parse {
        path: path.display().to_string(),
        message,
    };
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => ron::from_str(&contents).map_err(|e| parse_err(e.to_string())),
        Some("toml") => toml::from_str(&contents).map_err(|e| parse_err(e.to_string())),
        _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
    }
}

/// Movement feel. Defaults reproduce the shipped levels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Horizontal run speed (units/s).
    pub speed: f32,
    pub jump_velocity: f32,
    /// Visual scale. The collision radius is `scale * radius_multiplier`.
    pub scale: f32,
    pub radius_multiplier: f32,
    /// Lateral speed imparted by a wall jump, along the wall normal.
    pub wall_jump_horizontal: f32,
    pub wall_jump_cooldown: f32,
    /// Seconds after a wall jump during which movement input does not
    /// overwrite horizontal velocity.
    pub wall_jump_momentum_lock: f32,
    /// Seconds a wall jump stays available after wall contact ends.
    pub wall_cling_time: f32,
    pub coyote_time: f32,
    pub jump_buffer: f32,
    pub ground_friction: f32,
    /// Yaw turn rate toward the move direction (1/s).
    pub turn_rate: f32,
    /// |normal.y| above this is floor or ceiling, below it is wall.
    pub ground_normal_threshold: f32,
}

impl PlayerTuning {
    pub fn collision_radius(&self) -> f32 {
        self.scale * self.radius_multiplier
    }
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            speed: 12.0,
            jump_velocity: 9.0,
            scale: 0.4,
            radius_multiplier: 0.5,
            wall_jump_horizontal: 8.0,
            wall_jump_cooldown: 0.3,
            wall_jump_momentum_lock: 0.25,
            wall_cling_time: 0.15,
            coyote_time: 0.1,
            jump_buffer: 0.1,
            ground_friction: 5.0,
            turn_rate: 15.0,
            ground_normal_threshold: 0.7,
        }
    }
}

/// One segment of scripted input: hold `keys` for `duration` seconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputStep {
    pub duration: f32,
    #[serde(default)]
    pub keys: Vec<Key>,
}

/// Timed key sequence for headless runs.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InputScript {
    pub steps: Vec<InputStep>,
    /// Restart from the first step after the last one ends.
    #[serde(default)]
    pub repeat: bool,
}

impl InputScript {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let script: Self = load_file(path)?;
        if script.steps.iter().any(|s| !(s.duration > 0.0)) {
            return Err(ConfigError::Invalid(format!(
                "{}: every input step needs a positive duration",
                path.display()
            )));
        }
        Ok(script)
    }

    fn total(&self) -> f32 {
        self.steps.iter().map(|s| s.duration).sum()
    }

    /// Keys held at `time` seconds into the script. Past the end, nothing is
    /// held unless the script repeats.
    pub fn keys_at(&self, time: f32) -> &[Key] {
        let total = self.total();
        if total <= 0.0 {
            return &[];
        }
        let mut t = if self.repeat { time.rem_euclid(total) } else { time };
        for step in &self.steps {
            if t < step.duration {
                return &step.keys;
            }
            t -= step.duration;
        }
        &[]
    }
}
