pub mod level;
pub mod prefabs;

use hecs::World;

pub use level::{LevelConfig, ObstacleDef, OrbDef, PlatformDef, ResetSlabDef, TwinPlatformDef};

use prefabs::{spawn_obstacle, spawn_orb, spawn_platform, spawn_reset_slab, spawn_twin_platform};

/// Spawn every entity a level defines. Entities are spawned in file order,
/// platforms first, which fixes the order scene queries visit them.
/// Returns the number of entities spawned.
pub fn spawn_level(world: &mut World, level: &LevelConfig) -> usize {
    let mut count = 0;
    for def in &level.platforms {
        spawn_platform(world, def);
        count += 1;
    }
    for def in &level.twin_platforms {
        spawn_twin_platform(world, def);
        count += 1;
    }
    for def in &level.reset_slabs {
        spawn_reset_slab(world, def);
        count += 1;
    }
    for def in &level.obstacles {
        spawn_obstacle(world, def);
        count += 1;
    }
    for def in &level.orbs {
        spawn_orb(world, def);
        count += 1;
    }
    log::debug!("spawned {count} entities for '{}'", level.name);
    count
}
