use glam::Vec3;
use hecs::Entity;

bitflags::bitflags! {
    /// Collision layers. Every query names the layers it may hit; an entity
    /// whose layer does not intersect the filter is skipped before any
    /// geometric test.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CollisionFilter: u8 {
        const FLOOR = 1 << 0;
        const WALL = 1 << 1;
        const PLAYER = 1 << 2;
        const ENEMY = 1 << 3;
        const SCENARIO = Self::FLOOR.bits() | Self::WALL.bits();
        const ALL = 0xFF;
    }
}

/// World-space center of an entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position(pub Vec3);

/// Axis-aligned box shape, centered on the entity's [`Position`].
///
/// `layer` is empty for entities that must never be hit by a scene query
/// (moving obstacles are checked by hand instead).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxCollider {
    pub half_extents: Vec3,
    pub layer: CollisionFilter,
}

/// Result of a single ray or sphere query.
///
/// A miss is a value, not an error: `collided == false` and
/// `distance == f32::INFINITY`. Callers branch on `collided`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollisionHit {
    pub point: Vec3,
    /// Unit length, pointing away from the struck surface.
    pub normal: Vec3,
    pub distance: f32,
    pub collided: bool,
    /// Non-owning reference to the struck entity.
    pub collider: Option<Entity>,
}

impl CollisionHit {
    pub const MISS: Self = Self {
        point: Vec3::ZERO,
        normal: Vec3::ZERO,
        distance: f32::INFINITY,
        collided: false,
        collider: None,
    };
}

impl Default for CollisionHit {
    fn default() -> Self {
        Self::MISS
    }
}

/// What a collidable entity is, as far as the movement core cares.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColliderKind {
    Platform,
    ResetSlab,
    Obstacle,
}

/// Capability interface for anything the collision queries can test.
///
/// Queries are generic over this trait, so the resolver never needs to ask
/// "which concrete entity type is this".
pub trait Collidable {
    fn entity(&self) -> Entity;
    fn center(&self) -> Vec3;
    fn half_extents(&self) -> Vec3;
    fn layer(&self) -> CollisionFilter;
    fn kind(&self) -> ColliderKind;

    /// A ghost is an inactive twin platform. Ghosts take part in no
    /// collision response.
    fn is_ghost(&self) -> bool {
        false
    }

    /// Per-second displacement of a moving platform, `None` for static ones.
    fn carry_velocity(&self) -> Option<Vec3> {
        None
    }

    fn is_platform(&self) -> bool {
        self.kind() == ColliderKind::Platform
    }

    /// Top face height.
    fn top(&self) -> f32 {
        self.center().y + self.half_extents().y
    }
}

impl<C: Collidable + ?Sized> Collidable for &C {
    fn entity(&self) -> Entity {
        (**self).entity()
    }

    fn center(&self) -> Vec3 {
        (**self).center()
    }

    fn half_extents(&self) -> Vec3 {
        (**self).half_extents()
    }

    fn layer(&self) -> CollisionFilter {
        (**self).layer()
    }

    fn kind(&self) -> ColliderKind {
        (**self).kind()
    }

    fn is_ghost(&self) -> bool {
        (**self).is_ghost()
    }

    fn carry_velocity(&self) -> Option<Vec3> {
        (**self).carry_velocity()
    }
}

/// Per-tick snapshot of one collidable entity.
///
/// Built once per tick by `gather_colliders` so the many ray and sphere
/// queries of a tick read plain data instead of re-borrowing the world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColliderView {
    pub entity: Entity,
    pub center: Vec3,
    pub half_extents: Vec3,
    pub layer: CollisionFilter,
    pub kind: ColliderKind,
    pub ghost: bool,
    pub carry_velocity: Option<Vec3>,
}

impl Collidable for ColliderView {
    fn entity(&self) -> Entity {
        self.entity
    }

    fn center(&self) -> Vec3 {
        self.center
    }

    fn half_extents(&self) -> Vec3 {
        self.half_extents
    }

    fn layer(&self) -> CollisionFilter {
        self.layer
    }

    fn kind(&self) -> ColliderKind {
        self.kind
    }

    fn is_ghost(&self) -> bool {
        self.ghost
    }

    fn carry_velocity(&self) -> Option<Vec3> {
        self.carry_velocity
    }
}
