//! Declarative level definitions, loaded from RON or TOML.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::components::MotionProfile;
use crate::config::{load_file, ConfigError, PlayerTuning};

const WHITE: [f32; 4] = [1.0; 4];

fn default_gravity() -> f32 {
    9.8
}

fn default_color() -> [f32; 4] {
    WHITE
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlatformDef {
    pub position: Vec3,
    pub half_extents: Vec3,
    #[serde(default = "default_color")]
    pub color: [f32; 4],
    /// `None` for a static platform. A moving platform starts wherever its
    /// profile puts it at t = 0.
    #[serde(default)]
    pub motion: MotionProfile,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TwinPlatformDef {
    pub position: Vec3,
    pub half_extents: Vec3,
    #[serde(default = "default_color")]
    pub color: [f32; 4],
    pub group: u32,
    pub starts_active: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrbDef {
    pub position: Vec3,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResetSlabDef {
    pub position: Vec3,
    pub half_extents: Vec3,
    #[serde(default = "default_color")]
    pub color: [f32; 4],
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObstacleDef {
    pub position: Vec3,
    pub half_extents: Vec3,
    #[serde(default)]
    pub motion: MotionProfile,
}

/// One playable level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub name: String,
    #[serde(default = "default_gravity")]
    pub gravity: f32,
    pub player_start: Vec3,
    /// Falling below this height sends the player back to the checkpoint.
    #[serde(default)]
    pub kill_height: Option<f32>,
    /// Overrides the default movement tuning for this level.
    #[serde(default)]
    pub tuning: Option<PlayerTuning>,
    #[serde(default)]
    pub platforms: Vec<PlatformDef>,
    #[serde(default)]
    pub twin_platforms: Vec<TwinPlatformDef>,
    #[serde(default)]
    pub orbs: Vec<OrbDef>,
    #[serde(default)]
    pub reset_slabs: Vec<ResetSlabDef>,
    #[serde(default)]
    pub obstacles: Vec<ObstacleDef>,
}

impl LevelConfig {
    /// Load and validate a level file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let level: Self = load_file(path)?;
        level.validate()?;
        log::info!(
            "loaded level '{}' from {} ({} platforms, {} twins, {} orbs)",
            level.name,
            path.display(),
            level.platforms.len(),
            level.twin_platforms.len(),
            level.orbs.len()
        );
        Ok(level)
    }

    /// Tuning in effect: the level override or the defaults.
    pub fn player_tuning(&self) -> PlayerTuning {
        self.tuning.clone().unwrap_or_default()
    }

    /// Reject geometry the collision core cannot handle.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.gravity.is_finite() || self.gravity < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "level '{}': gravity must be a non-negative number, got {}",
                self.name, self.gravity
            )));
        }
        if !self.player_start.is_finite() {
            return Err(ConfigError::Invalid(format!("level '{}': player start is not finite", self.name)));
        }

        let boxes = self
            .platforms
            .iter()
            .map(|p| ("platform", p.position, p.half_extents))
            .chain(self.twin_platforms.iter().map(|t| ("twin platform", t.position, t.half_extents)))
            .chain(self.reset_slabs.iter().map(|s| ("reset slab", s.position, s.half_extents)))
            .chain(self.obstacles.iter().map(|o| ("obstacle", o.position, o.half_extents)));
        for (what, position, half) in boxes {
            if !half.cmpgt(Vec3::ZERO).all() || !half.is_finite() {
                return Err(ConfigError::Invalid(format!(
                    "level '{}': {what} at {position} has non-positive half extents {half}",
                    self.name
                )));
            }
        }

        if let Some(tuning) = &self.tuning {
            if !(tuning.collision_radius() > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "level '{}': tuning gives a non-positive collision radius",
                    self.name
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"(
        name: "Minimal",
        player_start: (0.0, 1.5, 0.0),
        platforms: [
            (position: (0.0, 0.0, 0.0), half_extents: (10.0, 0.5, 10.0)),
            (
                position: (-4.0, 11.0, -120.0),
                half_extents: (4.0, 0.5, 4.0),
                motion: Linear(start: (-4.0, 11.0, -120.0), end: (4.0, 11.0, -120.0), speed: 0.4),
            ),
        ],
        twin_platforms: [
            (position: (-6.0, 12.0, -65.0), half_extents: (5.0, 0.5, 5.0), group: 0, starts_active: true),
        ],
        orbs: [(position: (0.0, 2.0, -28.0))],
    )"#;

    #[test]
    fn minimal_level_fills_defaults() {
        let level: LevelConfig = ron::from_str(MINIMAL).unwrap();
        assert_eq!(level.gravity, 9.8);
        assert_eq!(level.kill_height, None);
        assert_eq!(level.platforms[0].color, WHITE);
        assert_eq!(level.platforms[0].motion, MotionProfile::None);
        assert!(level.platforms[1].motion.is_moving());
        assert_eq!(level.player_tuning(), PlayerTuning::default());
        assert!(level.validate().is_ok());
    }

    #[test]
    fn flat_box_is_rejected() {
        let mut level: LevelConfig = ron::from_str(MINIMAL).unwrap();
        level.platforms[0].half_extents.y = 0.0;
        let err = level.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn negative_gravity_is_rejected() {
        let mut level: LevelConfig = ron::from_str(MINIMAL).unwrap();
        level.gravity = -1.0;
        assert!(level.validate().is_err());
    }

    #[test]
    fn tuning_override_is_partial() {
        let src = r#"(name: "Heavy", gravity: 19.6, player_start: (0.0, 2.0, 0.0), tuning: Some((jump_velocity: 12.0)))"#;
        let level: LevelConfig = ron::from_str(src).unwrap();
        let tuning = level.player_tuning();
        assert_eq!(tuning.jump_velocity, 12.0);
        assert_eq!(tuning.speed, PlayerTuning::default().speed);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = LevelConfig::load(Path::new("levels/does_not_exist.ron")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
