use hecs::{Entity, World};

use crate::components::*;
use crate::scene::level::{ObstacleDef, OrbDef, PlatformDef, ResetSlabDef, TwinPlatformDef};

/// Spawn a static or moving platform.
/// Moving platforms get a `PlatformMotion` and start at their t = 0 position.
pub fn spawn_platform(world: &mut World, def: &PlatformDef) -> Entity {
    let collider = BoxCollider {
        half_extents: def.half_extents,
        layer: CollisionFilter::SCENARIO,
    };
    if def.motion.is_moving() {
        let motion = PlatformMotion::new(def.motion, def.position);
        world.spawn((
            Position(motion.position()),
            collider,
            Platform,
            Color(def.color),
            motion,
        ))
    } else {
        world.spawn((Position(def.position), collider, Platform, Color(def.color)))
    }
}

/// Spawn one member of a twin group. Inactive members start as ghosts.
pub fn spawn_twin_platform(world: &mut World, def: &TwinPlatformDef) -> Entity {
    world.spawn((
        Position(def.position),
        BoxCollider {
            half_extents: def.half_extents,
            layer: CollisionFilter::SCENARIO,
        },
        Platform,
        Color(def.color),
        TwinMember::new(def.group, def.starts_active),
    ))
}

pub fn spawn_orb(world: &mut World, def: &OrbDef) -> Entity {
    world.spawn((Position(def.position), Orb::new()))
}

/// Reset slabs sit on the Floor layer, like the ground they replace.
pub fn spawn_reset_slab(world: &mut World, def: &ResetSlabDef) -> Entity {
    world.spawn((
        Position(def.position),
        BoxCollider {
            half_extents: def.half_extents,
            layer: CollisionFilter::FLOOR,
        },
        ResetSlab,
        Color(def.color),
    ))
}

/// Obstacles carry an empty layer: no scene query sees them, and the hazard
/// check tests them directly.
pub fn spawn_obstacle(world: &mut World, def: &ObstacleDef) -> Entity {
    let motion = PlatformMotion::new(def.motion, def.position);
    world.spawn((
        Position(motion.position()),
        BoxCollider {
            half_extents: def.half_extents,
            layer: CollisionFilter::empty(),
        },
        Obstacle,
        motion,
    ))
}
