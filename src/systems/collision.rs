use glam::Vec3;
use hecs::World;

use crate::components::{
    BoxCollider, Collidable, ColliderKind, ColliderView, CollisionFilter, CollisionHit, Obstacle,
    Platform, PlatformMotion, Position, ResetSlab, TwinMember,
};

/// Below this length a vector is not normalized; callers get a fallback axis.
pub const MIN_NORMAL_LENGTH: f32 = 1e-3;

/// Normalize `v`, or return `fallback` if it is too short to do safely.
pub fn safe_normalize(v: Vec3, fallback: Vec3) -> Vec3 {
    let len = v.length();
    if len < MIN_NORMAL_LENGTH || !len.is_finite() {
        return fallback;
    }
    v / len
}

/// Point of the box nearest to `p`.
pub fn closest_point_on_aabb(p: Vec3, center: Vec3, half: Vec3) -> Vec3 {
    p.clamp(center - half, center + half)
}

/// Whether `p` lies inside the box grown by `margin` on every side.
pub fn aabb_contains(p: Vec3, center: Vec3, half: Vec3, margin: f32) -> bool {
    let d = (p - center).abs();
    let reach = half + Vec3::splat(margin);
    d.x <= reach.x && d.y <= reach.y && d.z <= reach.z
}

/// Outward normal of the box face nearest to `p`.
///
/// Ties go to X, then Y, then Z. The sign follows which side of the center
/// `p` is on (positive when exactly centered).
pub fn nearest_face_normal(p: Vec3, center: Vec3, half: Vec3) -> Vec3 {
    let min = center - half;
    let max = center + half;
    let face_x = (p.x - min.x).abs().min((p.x - max.x).abs());
    let face_y = (p.y - min.y).abs().min((p.y - max.y).abs());
    let face_z = (p.z - min.z).abs().min((p.z - max.z).abs());
    let side = |a: f32, c: f32| if a >= c { 1.0 } else { -1.0 };

    if face_x <= face_y && face_x <= face_z {
        Vec3::new(side(p.x, center.x), 0.0, 0.0)
    } else if face_y <= face_z {
        Vec3::new(0.0, side(p.y, center.y), 0.0)
    } else {
        Vec3::new(0.0, 0.0, side(p.z, center.z))
    }
}

/// Sphere-vs-AABB overlap.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AabbContact {
    pub closest: Vec3,
    /// Unit direction that moves the sphere out of the box.
    pub push: Vec3,
    pub penetration: f32,
}

/// Overlap test with the degenerate case handled: when the sphere center
/// sits on or inside the box, the closest point coincides with the center
/// and the push falls back to the nearest face, with penetration defaulted
/// to the full radius.
pub fn sphere_vs_aabb(center: Vec3, radius: f32, box_center: Vec3, half: Vec3) -> Option<AabbContact> {
    let closest = closest_point_on_aabb(center, box_center, half);
    let diff = center - closest;
    let dist_sq = diff.length_squared();
    if dist_sq >= radius * radius {
        return None;
    }

    let dist = dist_sq.sqrt();
    if dist < MIN_NORMAL_LENGTH {
        return Some(AabbContact {
            closest,
            push: nearest_face_normal(center, box_center, half),
            penetration: radius,
        });
    }

    Some(AabbContact {
        closest,
        push: diff / dist,
        penetration: radius - dist,
    })
}

/// Sphere test against one entity's box.
///
/// Returns zero or one hit for a box; normals point away from the surface.
/// A filtered-out or shapeless entity yields an empty list.
pub fn sphere_entity_test<C: Collidable>(
    entity: &C,
    radius: f32,
    center: Vec3,
    filter: CollisionFilter,
) -> Vec<CollisionHit> {
    if !is_queryable(entity, filter) {
        return Vec::new();
    }
    match sphere_vs_aabb(center, radius, entity.center(), entity.half_extents()) {
        Some(contact) => vec![CollisionHit {
            point: contact.closest,
            normal: contact.push,
            distance: center.distance(contact.closest),
            collided: true,
            collider: Some(entity.entity()),
        }],
        None => Vec::new(),
    }
}

/// Layer filter and shape sanity check shared by every query.
pub(crate) fn is_queryable<C: Collidable>(entity: &C, filter: CollisionFilter) -> bool {
    entity.layer().intersects(filter) && entity.half_extents().cmpgt(Vec3::ZERO).all()
}

/// Snapshot every collidable entity, in spawn order.
pub fn gather_colliders(world: &World) -> Vec<ColliderView> {
    let mut views: Vec<ColliderView> = world
        .query::<(
            &Position,
            &BoxCollider,
            Option<&Platform>,
            Option<&ResetSlab>,
            Option<&Obstacle>,
            Option<&TwinMember>,
            Option<&PlatformMotion>,
        )>()
        .iter()
        .filter_map(|(entity, (pos, collider, platform, slab, obstacle, twin, motion))| {
            let kind = if platform.is_some() {
                ColliderKind::Platform
            } else if slab.is_some() {
                ColliderKind::ResetSlab
            } else if obstacle.is_some() {
                ColliderKind::Obstacle
            } else {
                return None;
            };
            Some(ColliderView {
                entity,
                center: pos.0,
                half_extents: collider.half_extents,
                layer: collider.layer,
                kind,
                ghost: twin.is_some_and(TwinMember::is_ghost),
                carry_velocity: motion
                    .filter(|m| m.profile.is_moving())
                    .map(PlatformMotion::velocity),
            })
        })
        .collect();
    views.sort_by_key(|v| v.entity.id());
    views
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use crate::components::Color;

    fn platform_view(world: &mut World, center: Vec3, half: Vec3) -> ColliderView {
        let entity = world.spawn((
            Position(center),
            BoxCollider { half_extents: half, layer: CollisionFilter::SCENARIO },
            Platform,
            Color([1.0; 4]),
        ));
        gather_colliders(world)
            .into_iter()
            .find(|v| v.entity == entity)
            .unwrap()
    }

    #[test]
    fn safe_normalize_falls_back_on_short_vectors() {
        assert_eq!(safe_normalize(Vec3::ZERO, Vec3::Z), Vec3::Z);
        assert_eq!(safe_normalize(Vec3::splat(1e-5), Vec3::Z), Vec3::Z);
        assert_eq!(safe_normalize(Vec3::new(0.0, 3.0, 0.0), Vec3::Z), Vec3::Y);
    }

    #[test]
    fn sphere_touching_face_reports_penetration() {
        let contact = sphere_vs_aabb(
            Vec3::new(9.85, 1.0, 0.0),
            0.2,
            Vec3::new(10.5, 1.0, 0.0),
            Vec3::new(0.5, 2.0, 2.0),
        )
        .unwrap();
        assert_eq!(contact.push, Vec3::NEG_X);
        assert_abs_diff_eq!(contact.penetration, 0.05, epsilon = 1e-5);
    }

    #[test]
    fn separated_sphere_has_no_contact() {
        assert!(sphere_vs_aabb(Vec3::new(0.0, 2.0, 0.0), 0.2, Vec3::ZERO, Vec3::ONE).is_none());
        // Exactly touching is not overlapping.
        assert!(sphere_vs_aabb(Vec3::new(0.0, 1.5, 0.0), 0.5, Vec3::ZERO, Vec3::ONE).is_none());
    }

    #[test]
    fn center_inside_box_pushes_through_nearest_face() {
        let contact = sphere_vs_aabb(
            Vec3::new(0.0, 0.9, 0.0),
            0.2,
            Vec3::ZERO,
            Vec3::new(2.0, 1.0, 2.0),
        )
        .unwrap();
        assert_eq!(contact.push, Vec3::Y);
        assert_eq!(contact.penetration, 0.2);
    }

    #[test]
    fn nearest_face_ties_prefer_x_then_y() {
        let n = nearest_face_normal(Vec3::ZERO, Vec3::ZERO, Vec3::ONE);
        assert_eq!(n, Vec3::X);
        let n = nearest_face_normal(Vec3::new(0.0, 0.0, 0.0), Vec3::ZERO, Vec3::new(2.0, 1.0, 1.0));
        assert_eq!(n, Vec3::Y);
    }

    #[test]
    fn sphere_entity_test_honours_filter() {
        let mut world = World::new();
        let view = platform_view(&mut world, Vec3::ZERO, Vec3::ONE);
        let center = Vec3::new(0.0, 1.1, 0.0);

        let hits = sphere_entity_test(&view, 0.2, center, CollisionFilter::FLOOR);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].normal, Vec3::Y);
        assert_eq!(hits[0].collider, Some(view.entity));
        assert_abs_diff_eq!(hits[0].distance, 0.1, epsilon = 1e-5);

        assert!(sphere_entity_test(&view, 0.2, center, CollisionFilter::ENEMY).is_empty());
    }

    #[test]
    fn shapeless_entity_yields_no_hit() {
        let mut world = World::new();
        let view = platform_view(&mut world, Vec3::ZERO, Vec3::new(1.0, 0.0, 1.0));
        assert!(sphere_entity_test(&view, 0.5, Vec3::ZERO, CollisionFilter::ALL).is_empty());
    }

    #[test]
    fn gather_marks_ghosts_and_moving_platforms() {
        let mut world = World::new();
        let ghost = world.spawn((
            Position(Vec3::ZERO),
            BoxCollider { half_extents: Vec3::ONE, layer: CollisionFilter::SCENARIO },
            Platform,
            TwinMember::new(3, false),
        ));
        let untagged = world.spawn((
            Position(Vec3::ZERO),
            BoxCollider { half_extents: Vec3::ONE, layer: CollisionFilter::SCENARIO },
        ));

        let views = gather_colliders(&world);
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].entity, ghost);
        assert!(views[0].is_ghost());
        assert!(views[0].carry_velocity().is_none());
        assert!(views.iter().all(|v| v.entity != untagged));
    }
}
