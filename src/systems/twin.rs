use std::collections::BTreeMap;

use hecs::{Entity, World};

use crate::components::{JumpKind, TwinMember};

/// Twin platforms grouped by id, built once per level load.
///
/// Toggling a group flips `active` on every member in one pass, so a group
/// is never observed half-swapped between queries.
#[derive(Clone, Debug, Default)]
pub struct TwinGroupRegistry {
    groups: BTreeMap<u32, Vec<Entity>>,
}

impl TwinGroupRegistry {
    pub fn from_world(world: &World) -> Self {
        let mut groups: BTreeMap<u32, Vec<Entity>> = BTreeMap::new();
        for (entity, twin) in world.query::<&TwinMember>().iter() {
            groups.entry(twin.group).or_default().push(entity);
        }
        for members in groups.values_mut() {
            members.sort_by_key(|e| e.id());
        }
        Self { groups }
    }

    pub fn group_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.groups.keys().copied()
    }

    pub fn members(&self, group: u32) -> &[Entity] {
        self.groups.get(&group).map(Vec::as_slice).unwrap_or(&[])
    }

    /// React to the jump reported by the physics step. Any executed jump,
    /// ground or wall, toggles every group. Returns the toggled group ids.
    pub fn on_jump(&self, world: &mut World, jump: JumpKind) -> Vec<u32> {
        if !jump.fired() {
            return Vec::new();
        }
        self.toggle_all(world)
    }

    pub fn toggle_all(&self, world: &mut World) -> Vec<u32> {
        self.group_ids()
            .filter(|&group| self.toggle_group(world, group))
            .collect()
    }

    /// Flip active/ghost for every member of `group`. Returns false for an
    /// unknown group.
    pub fn toggle_group(&self, world: &mut World, group: u32) -> bool {
        let Some(members) = self.groups.get(&group) else {
            return false;
        };
        for &entity in members {
            if let Ok(mut twin) = world.get::<&mut TwinMember>(entity) {
                twin.active = !twin.active;
            }
        }
        log::debug!("twin group {group} toggled ({} members)", members.len());
        true
    }

    /// Restore every member to its load-time state.
    pub fn reset(&self, world: &mut World) {
        for &entity in self.groups.values().flatten() {
            if let Ok(mut twin) = world.get::<&mut TwinMember>(entity) {
                twin.active = twin.starts_active;
            }
        }
    }
}
