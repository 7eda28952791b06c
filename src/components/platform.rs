use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Marker: entity is a level platform (solid box the player can stand on,
/// slide along, or bump into from below).
#[derive(Clone, Copy, Debug, Default)]
pub struct Platform;

/// RGBA tint carried through for whatever draws the level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color(pub [f32; 4]);

/// Closed-form platform path. Position is a pure function of elapsed time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum MotionProfile {
    #[default]
    None,
    /// Ping-pong between `start` and `end` with smoothstep easing.
    /// One leg takes `1 / speed` seconds.
    Linear {
        start: Vec3,
        end: Vec3,
        speed: f32,
        #[serde(default)]
        phase: f32,
    },
    /// Horizontal orbit around `center` at angular speed `speed` (rad/s).
    Circular {
        center: Vec3,
        radius: f32,
        speed: f32,
        #[serde(default)]
        phase: f32,
    },
}

impl MotionProfile {
    pub fn is_moving(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Position at `elapsed` seconds, or `None` for a static profile.
    pub fn position_at(&self, elapsed: f32) -> Option<Vec3> {
        match *self {
            Self::None => None,
            Self::Linear { start, end, speed, phase } => {
                let cycle = elapsed * speed + phase;
                let mut u = cycle.rem_euclid(2.0);
                if u > 1.0 {
                    u = 2.0 - u;
                }
                let eased = u * u * (3.0 - 2.0 * u);
                Some(start.lerp(end, eased))
            }
            Self::Circular { center, radius, speed, phase } => {
                let angle = elapsed * speed + phase;
                Some(Vec3::new(
                    center.x + radius * angle.cos(),
                    center.y,
                    center.z + radius * angle.sin(),
                ))
            }
        }
    }
}

/// Drives an entity's [`Position`](super::Position) along a [`MotionProfile`].
///
/// `update` is the only mutator. Because position is recomputed from the
/// accumulated clock every tick, replaying the same `dt` sequence reproduces
/// the same positions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlatformMotion {
    pub profile: MotionProfile,
    pub elapsed: f32,
    last_position: Vec3,
    velocity: Vec3,
}

impl PlatformMotion {
    /// `fallback` is used as the resting position of a `None` profile.
    pub fn new(profile: MotionProfile, fallback: Vec3) -> Self {
        let start = profile.position_at(0.0).unwrap_or(fallback);
        Self {
            profile,
            elapsed: 0.0,
            last_position: start,
            velocity: Vec3::ZERO,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.last_position
    }

    /// Discrete derivative of the last step, `(new - last) / dt`.
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Advance the clock by `dt` and return the new position.
    pub fn update(&mut self, dt: f32) -> Vec3 {
        self.elapsed += dt;
        let Some(next) = self.profile.position_at(self.elapsed) else {
            self.velocity = Vec3::ZERO;
            return self.last_position;
        };
        self.velocity = if dt > f32::EPSILON {
            (next - self.last_position) / dt
        } else {
            Vec3::ZERO
        };
        self.last_position = next;
        next
    }

    /// Rewind to t = 0 (level reset).
    pub fn rewind(&mut self) {
        *self = Self::new(self.profile, self.last_position);
    }
}

/// Membership in a twin group. Exactly the `active` members are solid; the
/// rest are ghosts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TwinMember {
    pub group: u32,
    pub active: bool,
    /// State to restore on level reset.
    pub starts_active: bool,
}

impl TwinMember {
    pub fn new(group: u32, starts_active: bool) -> Self {
        Self {
            group,
            active: starts_active,
            starts_active,
        }
    }

    pub fn is_ghost(&self) -> bool {
        !self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::PI;

    #[test]
    fn linear_starts_at_start_and_reaches_end_after_one_leg() {
        let profile = MotionProfile::Linear {
            start: Vec3::new(-4.0, 11.0, -120.0),
            end: Vec3::new(4.0, 11.0, -120.0),
            speed: 0.5,
            phase: 0.0,
        };
        assert_eq!(profile.position_at(0.0), Some(Vec3::new(-4.0, 11.0, -120.0)));
        let end = profile.position_at(2.0).unwrap();
        assert_abs_diff_eq!(end.x, 4.0, epsilon = 1e-5);
        // Ping-pong: back at start after two legs.
        let back = profile.position_at(4.0).unwrap();
        assert_abs_diff_eq!(back.x, -4.0, epsilon = 1e-5);
    }

    #[test]
    fn linear_midpoint_is_eased_to_center() {
        let profile = MotionProfile::Linear {
            start: Vec3::ZERO,
            end: Vec3::new(0.0, 3.0, 0.0),
            speed: 1.0,
            phase: 0.0,
        };
        let quarter = profile.position_at(0.25).unwrap();
        // smoothstep(0.25) = 0.15625
        assert_abs_diff_eq!(quarter.y, 3.0 * 0.15625, epsilon = 1e-5);
        let mid = profile.position_at(0.5).unwrap();
        assert_abs_diff_eq!(mid.y, 1.5, epsilon = 1e-5);
    }

    #[test]
    fn circular_orbit_quarter_turn() {
        let profile = MotionProfile::Circular {
            center: Vec3::new(0.0, 10.0, -50.0),
            radius: 3.0,
            speed: 0.5,
            phase: 0.0,
        };
        let p = profile.position_at(PI).unwrap();
        assert_abs_diff_eq!(p.x, 0.0, epsilon = 1e-4);
        assert_abs_diff_eq!(p.y, 10.0, epsilon = 1e-6);
        assert_abs_diff_eq!(p.z, -47.0, epsilon = 1e-4);
    }

    #[test]
    fn replaying_the_same_steps_is_bit_identical() {
        let profile = MotionProfile::Circular {
            center: Vec3::new(2.5, 22.5, -410.0),
            radius: 2.5,
            speed: 0.6,
            phase: 3.14,
        };
        let steps = [1.0 / 60.0, 1.0 / 30.0, 0.007, 1.0 / 60.0, 0.25];
        let run = || {
            let mut motion = PlatformMotion::new(profile, Vec3::ZERO);
            steps.iter().map(|dt| motion.update(*dt)).collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn carry_velocity_is_discrete_derivative() {
        let profile = MotionProfile::Linear {
            start: Vec3::ZERO,
            end: Vec3::new(10.0, 0.0, 0.0),
            speed: 0.1,
            phase: 0.0,
        };
        let mut motion = PlatformMotion::new(profile, Vec3::ZERO);
        let before = motion.position();
        let after = motion.update(0.5);
        assert_abs_diff_eq!(motion.velocity().x, (after.x - before.x) / 0.5, epsilon = 1e-5);
    }

    #[test]
    fn zero_dt_leaves_velocity_zero() {
        let profile = MotionProfile::Circular {
            center: Vec3::ZERO,
            radius: 1.0,
            speed: 1.0,
            phase: 0.0,
        };
        let mut motion = PlatformMotion::new(profile, Vec3::ZERO);
        motion.update(0.0);
        assert_eq!(motion.velocity(), Vec3::ZERO);
    }

    #[test]
    fn twin_member_ghost_tracks_active_flag() {
        let mut twin = TwinMember::new(3, false);
        assert!(twin.is_ghost());
        twin.active = true;
        assert!(!twin.is_ghost());
        assert!(!twin.starts_active);
    }
}
