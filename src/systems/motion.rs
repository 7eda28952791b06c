use hecs::World;

use crate::components::{PlatformMotion, Position};

/// Advance every moving platform (and obstacle) by `dt` and write the new
/// position back. Runs first in a tick, so the collider snapshot taken
/// afterwards sees this tick's geometry and carry velocities.
pub fn platform_motion_system(world: &mut World, dt: f32) {
    for (_entity, (pos, motion)) in world.query_mut::<(&mut Position, &mut PlatformMotion)>() {
        if motion.profile.is_moving() {
            pos.0 = motion.update(dt);
        }
    }
}

/// Put every moving entity back at its t = 0 position.
pub fn rewind_motion_system(world: &mut World) {
    for (_entity, (pos, motion)) in world.query_mut::<(&mut Position, &mut PlatformMotion)>() {
        if motion.profile.is_moving() {
            motion.rewind();
            pos.0 = motion.position();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use glam::Vec3;

    use crate::components::MotionProfile;

    fn spawn_mover(world: &mut World, profile: MotionProfile, at: Vec3) -> hecs::Entity {
        world.spawn((Position(at), PlatformMotion::new(profile, at)))
    }

    #[test]
    fn moving_entities_follow_their_profile() {
        let mut world = World::new();
        let profile = MotionProfile::Circular {
            center: Vec3::new(0.0, 10.0, -50.0),
            radius: 3.0,
            speed: 0.5,
            phase: 0.0,
        };
        let e = spawn_mover(&mut world, profile, Vec3::new(3.0, 10.0, -50.0));
        for _ in 0..60 {
            platform_motion_system(&mut world, 1.0 / 60.0);
        }
        let pos = world.get::<&Position>(e).unwrap().0;
        let expected = profile.position_at(1.0).unwrap();
        assert_abs_diff_eq!(pos.x, expected.x, epsilon = 1e-4);
        assert_abs_diff_eq!(pos.z, expected.z, epsilon = 1e-4);
    }

    #[test]
    fn static_entities_stay_put() {
        let mut world = World::new();
        let at = Vec3::new(1.0, 2.0, 3.0);
        let e = spawn_mover(&mut world, MotionProfile::None, at);
        platform_motion_system(&mut world, 0.5);
        assert_eq!(world.get::<&Position>(e).unwrap().0, at);
    }

    #[test]
    fn rewind_returns_to_start() {
        let mut world = World::new();
        let start = Vec3::new(-4.0, 11.0, -120.0);
        let profile = MotionProfile::Linear {
            start,
            end: Vec3::new(4.0, 11.0, -120.0),
            speed: 0.5,
            phase: 0.0,
        };
        let e = spawn_mover(&mut world, profile, start);
        for _ in 0..45 {
            platform_motion_system(&mut world, 1.0 / 60.0);
        }
        assert_ne!(world.get::<&Position>(e).unwrap().0, start);

        rewind_motion_system(&mut world);
        assert_eq!(world.get::<&Position>(e).unwrap().0, start);
        let motion = *world.get::<&PlatformMotion>(e).unwrap();
        assert_eq!(motion.elapsed, 0.0);
        assert_eq!(motion.velocity(), Vec3::ZERO);
    }
}
