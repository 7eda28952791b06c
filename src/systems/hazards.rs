use glam::Vec3;
use hecs::{Entity, World};

use crate::components::{Collidable, ColliderKind, CollisionFilter, Orb, Position};

use super::collision::{sphere_entity_test, sphere_vs_aabb};

/// Why the player has to go back to the checkpoint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Hazard {
    ResetSlab(Entity),
    Obstacle(Entity),
    /// Fell below the level's kill height.
    OutOfBounds,
}

/// Mark every orb the player sphere touches as collected. Returns the newly
/// collected orbs with their positions, in spawn order.
pub fn orb_pickup_system(world: &mut World, player_center: Vec3, player_radius: f32) -> Vec<(Entity, Vec3)> {
    let mut picked: Vec<(Entity, Vec3)> = world
        .query_mut::<(&Position, &mut Orb)>()
        .into_iter()
        .filter(|(_, (pos, orb))| !orb.collected && orb.touches(pos.0, player_center, player_radius))
        .map(|(entity, (pos, orb))| {
            orb.collected = true;
            (entity, pos.0)
        })
        .collect();
    picked.sort_by_key(|(e, _)| e.id());
    picked
}

pub fn orbs_remaining(world: &World) -> usize {
    world
        .query::<&Orb>()
        .iter()
        .filter(|(_, orb)| !orb.collected)
        .count()
}

pub fn reset_orbs(world: &mut World) {
    for (_entity, orb) in world.query_mut::<&mut Orb>() {
        orb.collected = false;
    }
}

/// First hazard the player sphere is in, checked in the order: reset slabs,
/// obstacles, kill height.
pub fn hazard_check<C: Collidable>(
    colliders: &[C],
    center: Vec3,
    radius: f32,
    kill_height: Option<f32>,
) -> Option<Hazard> {
    for c in colliders {
        match c.kind() {
            ColliderKind::ResetSlab => {
                if !sphere_entity_test(c, radius, center, CollisionFilter::ALL).is_empty() {
                    return Some(Hazard::ResetSlab(c.entity()));
                }
            }
            // Obstacles sit on no layer, so scene queries skip them; test the
            // box directly.
            ColliderKind::Obstacle => {
                if sphere_vs_aabb(center, radius, c.center(), c.half_extents()).is_some() {
                    return Some(Hazard::Obstacle(c.entity()));
                }
            }
            ColliderKind::Platform => {}
        }
    }

    match kill_height {
        Some(floor) if center.y < floor => Some(Hazard::OutOfBounds),
        _ => None,
    }
}
