use std::collections::HashSet;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Facing used when the camera forward is degenerate (looking straight down,
/// or never set).
pub const WORLD_FORWARD: Vec3 = Vec3::NEG_Z;

/// Shortest vector we are willing to normalize.
const MIN_DIRECTION_LENGTH: f32 = 1e-3;

/// Logical buttons. The windowing layer maps its own key codes onto these.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Forward,
    Back,
    Left,
    Right,
    Jump,
}

/// Keys held this tick plus the horizontal camera facing that movement keys
/// are relative to.
///
/// This is a level snapshot. Rising-edge detection for jumps happens in the
/// player controller, which remembers the previous tick.
#[derive(Clone, Debug)]
pub struct InputState {
    keys: HashSet<Key>,
    forward: Vec3,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            keys: HashSet::new(),
            forward: WORLD_FORWARD,
        }
    }

    pub fn press(&mut self, key: Key) {
        self.keys.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.keys.remove(&key);
    }

    /// Replace the held set wholesale (scripted input).
    pub fn set_keys<I: IntoIterator<Item = Key>>(&mut self, keys: I) {
        self.keys.clear();
        self.keys.extend(keys);
    }

    pub fn is_key_held(&self, key: Key) -> bool {
        self.keys.contains(&key)
    }

    /// Set the camera facing. Only the horizontal part is kept.
    pub fn set_forward(&mut self, forward: Vec3) {
        self.forward = horizontal_or(forward, WORLD_FORWARD);
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    /// World-space horizontal move direction, unit length or zero.
    pub fn move_direction(&self) -> Vec3 {
        let forward = self.forward;
        let right = forward.cross(Vec3::Y);

        let mut dir = Vec3::ZERO;
        if self.is_key_held(Key::Forward) {
            dir += forward;
        }
        if self.is_key_held(Key::Back) {
            dir -= forward;
        }
        if self.is_key_held(Key::Left) {
            dir -= right;
        }
        if self.is_key_held(Key::Right) {
            dir += right;
        }
        if dir.length_squared() < MIN_DIRECTION_LENGTH * MIN_DIRECTION_LENGTH {
            return Vec3::ZERO;
        }
        dir.normalize()
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

/// Flatten `v` onto the XZ plane and normalize, or return `fallback` when
/// what is left is too short.
pub fn horizontal_or(v: Vec3, fallback: Vec3) -> Vec3 {
    let flat = Vec3::new(v.x, 0.0, v.z);
    if flat.length() < MIN_DIRECTION_LENGTH {
        return fallback;
    }
    flat.normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn default_forward_runs_down_negative_z() {
        let mut input = InputState::new();
        input.press(Key::Forward);
        assert_eq!(input.move_direction(), Vec3::NEG_Z);
        input.release(Key::Forward);
        input.press(Key::Right);
        assert_eq!(input.move_direction(), Vec3::X);
    }

    #[test]
    fn opposite_keys_cancel() {
        let mut input = InputState::new();
        input.set_keys([Key::Forward, Key::Back]);
        assert_eq!(input.move_direction(), Vec3::ZERO);
    }

    #[test]
    fn diagonal_is_normalized() {
        let mut input = InputState::new();
        input.set_keys([Key::Forward, Key::Right]);
        assert_abs_diff_eq!(input.move_direction().length(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn vertical_camera_falls_back_to_world_forward() {
        let mut input = InputState::new();
        input.set_forward(Vec3::NEG_Y);
        assert_eq!(input.forward(), WORLD_FORWARD);
        input.set_forward(Vec3::new(2.0, -5.0, 0.0));
        assert_eq!(input.forward(), Vec3::X);
    }
}
