use glam::Vec3;

use crate::components::{Collidable, CollisionFilter, CollisionHit};
use crate::engine::input::WORLD_FORWARD;

use super::collision::{is_queryable, safe_normalize};

/// Below this, a direction component counts as parallel to the slab.
const PARALLEL_EPSILON: f32 = 1e-8;

/// Cast a ray against every entity in `entities` that passes `filter`.
///
/// With `closest == false` the first qualifying hit is returned; otherwise
/// the nearest one across all entities. Hits farther than `max_distance` are
/// rejected. A miss comes back as [`CollisionHit::MISS`].
pub fn ray_scene_test<C: Collidable>(
    entities: &[C],
    origin: Vec3,
    direction: Vec3,
    filter: CollisionFilter,
    closest: bool,
    max_distance: f32,
) -> CollisionHit {
    let dir = safe_normalize(direction, WORLD_FORWARD);
    let mut best = CollisionHit::MISS;

    for entity in entities {
        let hit = ray_entity_test(entity, origin, dir, filter, max_distance);
        if hit.collided && hit.distance < best.distance {
            best = hit;
            if !closest {
                break;
            }
        }
    }

    best
}

/// Ray against a single entity's box. `direction` must be unit length.
pub fn ray_entity_test<C: Collidable>(
    entity: &C,
    origin: Vec3,
    direction: Vec3,
    filter: CollisionFilter,
    max_distance: f32,
) -> CollisionHit {
    if !is_queryable(entity, filter) {
        return CollisionHit::MISS;
    }
    match ray_aabb_intersection(origin, direction, entity.center(), entity.half_extents()) {
        Some((t, normal)) if t <= max_distance => CollisionHit {
            point: origin + direction * t,
            normal,
            distance: t,
            collided: true,
            collider: Some(entity.entity()),
        },
        _ => CollisionHit::MISS,
    }
}

/// Slab test. Returns the entry distance and the outward normal of the face
/// entered. A ray starting inside the box reports the exit face instead.
pub fn ray_aabb_intersection(origin: Vec3, dir: Vec3, center: Vec3, half: Vec3) -> Option<(f32, Vec3)> {
    let min = center - half;
    let max = center + half;

    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    let mut enter_normal = Vec3::ZERO;
    let mut exit_normal = Vec3::ZERO;

    for axis in 0..3 {
        let o = origin[axis];
        let d = dir[axis];

        if d.abs() < PARALLEL_EPSILON {
            if o < min[axis] || o > max[axis] {
                return None;
            }
            continue;
        }

        let unit = Vec3::AXES[axis];
        let (near, far, near_normal) = if d > 0.0 {
            (min[axis], max[axis], -unit)
        } else {
            (max[axis], min[axis], unit)
        };
        let t_near = (near - o) / d;
        let t_far = (far - o) / d;

        if t_near > t_enter {
            t_enter = t_near;
            enter_normal = near_normal;
        }
        if t_far < t_exit {
            t_exit = t_far;
            exit_normal = -near_normal;
        }
    }

    if t_exit < 0.0 || t_enter > t_exit || !t_exit.is_finite() {
        return None;
    }
    if t_enter >= 0.0 {
        Some((t_enter, enter_normal))
    } else {
        Some((t_exit, exit_normal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use hecs::World;

    use crate::components::{BoxCollider, ColliderView, Platform, Position, ResetSlab};
    use crate::systems::gather_colliders;

    fn scene(boxes: &[(Vec3, Vec3, CollisionFilter)]) -> Vec<ColliderView> {
        let mut world = World::new();
        for &(center, half, layer) in boxes {
            world.spawn((Position(center), BoxCollider { half_extents: half, layer }, Platform));
        }
        gather_colliders(&world)
    }

    #[test]
    fn downward_ray_hits_top_face() {
        let colliders = scene(&[(Vec3::new(0.0, 4.5, 0.0), Vec3::new(2.0, 0.5, 2.0), CollisionFilter::SCENARIO)]);
        let hit = ray_scene_test(&colliders, Vec3::new(0.3, 5.2, 0.0), Vec3::NEG_Y, CollisionFilter::FLOOR, true, 0.3);
        assert!(hit.collided);
        assert_eq!(hit.normal, Vec3::Y);
        assert_abs_diff_eq!(hit.distance, 0.2, epsilon = 1e-5);
        assert_abs_diff_eq!(hit.point.y, 5.0, epsilon = 1e-5);
        assert_eq!(hit.collider, Some(colliders[0].entity));
    }

    #[test]
    fn hits_past_max_distance_are_rejected() {
        let colliders = scene(&[(Vec3::ZERO, Vec3::ONE, CollisionFilter::FLOOR)]);
        let hit = ray_scene_test(&colliders, Vec3::new(0.0, 3.0, 0.0), Vec3::NEG_Y, CollisionFilter::FLOOR, true, 1.5);
        assert!(!hit.collided);
        assert_eq!(hit.distance, f32::INFINITY);
        assert_eq!(hit.collider, None);
    }

    #[test]
    fn closest_flag_selects_nearest_hit() {
        let colliders = scene(&[
            (Vec3::new(0.0, -5.0, 0.0), Vec3::ONE, CollisionFilter::FLOOR),
            (Vec3::new(0.0, -2.0, 0.0), Vec3::ONE, CollisionFilter::FLOOR),
        ]);
        let first = ray_scene_test(&colliders, Vec3::ZERO, Vec3::NEG_Y, CollisionFilter::FLOOR, false, 100.0);
        assert_eq!(first.collider, Some(colliders[0].entity));
        let nearest = ray_scene_test(&colliders, Vec3::ZERO, Vec3::NEG_Y, CollisionFilter::FLOOR, true, 100.0);
        assert_eq!(nearest.collider, Some(colliders[1].entity));
        assert_abs_diff_eq!(nearest.distance, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn filter_excludes_other_layers() {
        let colliders = scene(&[(Vec3::new(0.0, -2.0, 0.0), Vec3::ONE, CollisionFilter::WALL)]);
        let hit = ray_scene_test(&colliders, Vec3::ZERO, Vec3::NEG_Y, CollisionFilter::FLOOR, true, 10.0);
        assert!(!hit.collided);
    }

    #[test]
    fn parallel_ray_outside_slab_misses() {
        let hit = ray_aabb_intersection(Vec3::new(5.0, 0.0, 0.0), Vec3::NEG_Z, Vec3::ZERO, Vec3::ONE);
        assert!(hit.is_none());
    }

    #[test]
    fn ray_from_inside_reports_exit_face() {
        let (t, normal) = ray_aabb_intersection(Vec3::ZERO, Vec3::NEG_Y, Vec3::ZERO, Vec3::ONE).unwrap();
        assert_abs_diff_eq!(t, 1.0, epsilon = 1e-6);
        assert_eq!(normal, Vec3::NEG_Y);
    }

    #[test]
    fn zero_direction_falls_back_to_world_forward() {
        let colliders = scene(&[(Vec3::new(0.0, 0.0, -3.0), Vec3::ONE, CollisionFilter::WALL)]);
        let hit = ray_scene_test(&colliders, Vec3::ZERO, Vec3::ZERO, CollisionFilter::WALL, true, 10.0);
        assert!(hit.collided);
        assert_eq!(hit.normal, Vec3::Z);
    }

    #[test]
    fn untagged_entities_are_not_collidable() {
        let mut world = World::new();
        world.spawn((Position(Vec3::new(0.0, -2.0, 0.0)), BoxCollider { half_extents: Vec3::ONE, layer: CollisionFilter::FLOOR }));
        world.spawn((Position(Vec3::new(0.0, -6.0, 0.0)), BoxCollider { half_extents: Vec3::ONE, layer: CollisionFilter::FLOOR }, ResetSlab));
        let colliders = gather_colliders(&world);
        let hit = ray_scene_test(&colliders, Vec3::ZERO, Vec3::NEG_Y, CollisionFilter::FLOOR, true, 10.0);
        assert_abs_diff_eq!(hit.distance, 5.0, epsilon = 1e-5);
    }
}
