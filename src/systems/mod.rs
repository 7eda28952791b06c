mod collision;
mod hazards;
mod motion;
mod movement;
mod player;
mod raycast;
mod twin;

pub use collision::{
    aabb_contains, closest_point_on_aabb, gather_colliders, nearest_face_normal, safe_normalize,
    sphere_entity_test, sphere_vs_aabb, AabbContact, MIN_NORMAL_LENGTH,
};
pub use hazards::{hazard_check, orb_pickup_system, orbs_remaining, reset_orbs, Hazard};
pub use motion::{platform_motion_system, rewind_motion_system};
pub use movement::{
    detect_ground, probe_ground, resolve_collisions, settle_to_ground, GroundContact,
    MAX_RESIDUAL_PENETRATION,
};
pub use player::{Player, PlayerController};
pub use raycast::{ray_aabb_intersection, ray_entity_test, ray_scene_test};
pub use twin::TwinGroupRegistry;
