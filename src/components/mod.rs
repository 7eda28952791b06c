mod character;
mod hazards;
mod physics;
mod platform;

pub use character::{JumpKind, PlayerState};
pub use hazards::{Obstacle, Orb, ResetSlab};
pub use physics::{
    BoxCollider, Collidable, ColliderKind, ColliderView, CollisionFilter, CollisionHit, Position,
};
pub use platform::{Color, MotionProfile, Platform, PlatformMotion, TwinMember};
