use glam::Vec3;
use hecs::Entity;

use crate::components::{Collidable, CollisionFilter};

use super::collision::{aabb_contains, is_queryable, sphere_vs_aabb, MIN_NORMAL_LENGTH};
use super::player::PlayerController;
use super::raycast::ray_scene_test;

/// Ground rays sit this far from the center, in collision radii.
const PROBE_OFFSET: f32 = 0.85;
/// Ground ray length, in collision radii.
const PROBE_DISTANCE: f32 = 1.5;
/// Slack when matching a ground hit to a platform's top face.
const PLATFORM_XZ_TOLERANCE: f32 = 0.1;
const PLATFORM_TOP_TOLERANCE: f32 = 0.2;
/// Growth of ghost bounds for hits no platform claimed.
const GHOST_MARGIN: f32 = 0.5;
/// Largest height error the ground snap corrects.
const SNAP_TOLERANCE: f32 = 0.1;
const RESOLVE_ITERATIONS: usize = 3;
/// Extra distance added to wall and ceiling pushes.
const PUSH_EPSILON: f32 = 0.001;
/// Floor overlap left alone; anything deeper is pushed out.
pub const MAX_RESIDUAL_PENETRATION: f32 = 0.002;
/// A player this close above a platform top counts as above it.
const ABOVE_TOP_TOLERANCE: f32 = 0.01;
/// Thin platforms are treated as at least `radius + THIN_MARGIN` half-tall
/// when hit from the side.
const THIN_MARGIN: f32 = 0.5;
/// Proximity wall sphere, in collision radii.
const PROXIMITY_FACTOR: f32 = 1.2;
/// Ray length of the spawn settle.
const SETTLE_DISTANCE: f32 = 2.0;

/// Floor found under the player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroundContact {
    pub point: Vec3,
    /// Struck entity, when the ray hit one.
    pub collider: Option<Entity>,
    /// Set when the floor is a moving platform.
    pub carrier: Option<Entity>,
}

/// Five-ray ground probe: one from the center, four offset in X and Z.
///
/// The first ray whose hit is not on a ghost wins. A hit is attributed to the
/// platform whose top face it lies on. Hits no platform claims are dropped
/// when they fall inside the grown bounds of a ghost.
pub fn probe_ground<C: Collidable>(colliders: &[C], position: Vec3, radius: f32) -> Option<GroundContact> {
    let offset = radius * PROBE_OFFSET;
    let max_distance = radius * PROBE_DISTANCE;
    let origins = [
        Vec3::ZERO,
        Vec3::new(offset, 0.0, 0.0),
        Vec3::new(-offset, 0.0, 0.0),
        Vec3::new(0.0, 0.0, offset),
        Vec3::new(0.0, 0.0, -offset),
    ];

    for o in origins {
        let hit = ray_scene_test(
            colliders,
            position + o,
            Vec3::NEG_Y,
            CollisionFilter::FLOOR,
            true,
            max_distance,
        );
        if !hit.collided {
            continue;
        }

        match platform_under(colliders, hit.point) {
            Some(platform) if platform.is_ghost() => continue,
            Some(platform) => {
                return Some(GroundContact {
                    point: hit.point,
                    collider: Some(platform.entity()),
                    carrier: platform.carry_velocity().map(|_| platform.entity()),
                })
            }
            None if inside_ghost(colliders, hit.point) => continue,
            None => {
                return Some(GroundContact {
                    point: hit.point,
                    collider: hit.collider,
                    carrier: None,
                })
            }
        }
    }
    None
}

/// Platform whose top face holds `point`. A solid match beats a ghost one,
/// so twins stacked in the same spot resolve to whichever is active.
fn platform_under<C: Collidable>(colliders: &[C], point: Vec3) -> Option<&C> {
    let mut ghost = None;
    for c in colliders.iter().filter(|c| c.is_platform()) {
        let d = (point - c.center()).abs();
        let half = c.half_extents();
        let on_top = d.x <= half.x + PLATFORM_XZ_TOLERANCE
            && d.z <= half.z + PLATFORM_XZ_TOLERANCE
            && (point.y - c.top()).abs() < PLATFORM_TOP_TOLERANCE;
        if !on_top {
            continue;
        }
        if !c.is_ghost() {
            return Some(c);
        }
        ghost.get_or_insert(c);
    }
    ghost
}

fn inside_ghost<C: Collidable>(colliders: &[C], point: Vec3) -> bool {
    colliders
        .iter()
        .filter(|c| c.is_platform() && c.is_ghost())
        .any(|c| aabb_contains(point, c.center(), c.half_extents(), GHOST_MARGIN))
}

/// Platforms that take part in collision response this tick.
fn solid_platforms<C: Collidable>(colliders: &[C]) -> impl Iterator<Item = &C> {
    colliders
        .iter()
        .filter(|c| c.is_platform() && !c.is_ghost() && is_queryable(*c, CollisionFilter::SCENARIO))
}

/// Set grounded state from the ground probe. Runs before integration.
///
/// Ground only counts while falling or resting; a rising player is airborne
/// even with floor inside probe range.
pub fn detect_ground<C: Collidable>(controller: &mut PlayerController, colliders: &[C]) {
    let contact = probe_ground(colliders, controller.position(), controller.collision_radius());
    match contact {
        Some(contact) if controller.velocity().y <= 0.0 => controller.land(contact.carrier),
        _ => controller.lose_ground(),
    }
}

/// Push the player out of every solid platform. Runs after integration.
///
/// Order: clear wall contact, snap onto the floor under the probe, then up to
/// three passes of sphere-vs-box pushes classified as floor, ceiling or wall,
/// then the proximity wall check when no wall was hit.
pub fn resolve_collisions<C: Collidable>(controller: &mut PlayerController, colliders: &[C]) {
    let radius = controller.collision_radius();
    let threshold = controller.tuning().ground_normal_threshold;
    controller.clear_wall_contact();

    if let Some(contact) = probe_ground(colliders, controller.position(), radius) {
        if controller.velocity().y <= 0.0 {
            controller.land(contact.carrier);
            let error = (controller.position().y - (contact.point.y + radius)).abs();
            if error < SNAP_TOLERANCE {
                controller.snap_to_floor(contact.point.y);
            }
        }
    }

    for pass in 0..RESOLVE_ITERATIONS {
        let mut pushed = false;

        for c in solid_platforms(colliders) {
            let position = controller.position();
            let mut half = c.half_extents();
            if position.y <= c.top() + ABOVE_TOP_TOLERANCE {
                half.y = half.y.max(radius + THIN_MARGIN);
            }

            let Some(contact) = sphere_vs_aabb(position, radius, c.center(), half) else {
                continue;
            };
            let n = contact.push;

            if n.y > threshold {
                if controller.velocity().y <= 0.0 {
                    controller.mark_grounded();
                }
                if contact.penetration > MAX_RESIDUAL_PENETRATION {
                    controller.push_out_of_floor(n * contact.penetration);
                    pushed = true;
                }
            } else if n.y < -threshold {
                controller.hit_ceiling(n * (contact.penetration + PUSH_EPSILON));
                pushed = true;
            } else {
                controller.hit_wall(n, n * (contact.penetration + PUSH_EPSILON));
                pushed = true;
            }
            log::trace!("pass {pass}: push {n:?} by {:.4}", contact.penetration);
        }

        if !pushed {
            break;
        }
    }

    if !controller.touching_wall() {
        touch_nearby_wall(controller, colliders, radius * PROXIMITY_FACTOR, threshold);
    }
}

/// Wall contact without overlap: a slightly larger sphere touching a mostly
/// vertical face still arms the wall jump.
fn touch_nearby_wall<C: Collidable>(
    controller: &mut PlayerController,
    colliders: &[C],
    reach: f32,
    threshold: f32,
) {
    let position = controller.position();
    for c in solid_platforms(colliders) {
        let Some(contact) = sphere_vs_aabb(position, reach, c.center(), c.half_extents()) else {
            continue;
        };
        let to_player = position - contact.closest;
        let dist = to_player.length();
        if dist <= MIN_NORMAL_LENGTH {
            continue;
        }
        let n = to_player / dist;
        if n.y.abs() < threshold {
            controller.touch_wall(n);
            return;
        }
    }
}

/// One-shot snap onto the floor below a freshly placed player, using a
/// longer ray than the per-tick probe. Returns whether ground was found.
pub fn settle_to_ground<C: Collidable>(controller: &mut PlayerController, colliders: &[C]) -> bool {
    let solid: Vec<&C> = colliders.iter().filter(|c| !c.is_ghost()).collect();
    let hit = ray_scene_test(
        &solid,
        controller.position(),
        Vec3::NEG_Y,
        CollisionFilter::FLOOR,
        true,
        SETTLE_DISTANCE,
    );
    if !hit.collided {
        return false;
    }

    let carrier = solid
        .iter()
        .find(|c| Some(c.entity()) == hit.collider)
        .filter(|c| c.carry_velocity().is_some())
        .map(|c| c.entity());
    controller.snap_to_floor(hit.point.y);
    controller.land(carrier);
    true
}
