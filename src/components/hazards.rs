use glam::Vec3;

/// Collectible orb. Touching it collects it and moves the checkpoint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Orb {
    pub radius: f32,
    pub collected: bool,
}

impl Orb {
    pub const DEFAULT_RADIUS: f32 = 0.5;

    pub fn new() -> Self {
        Self {
            radius: Self::DEFAULT_RADIUS,
            collected: false,
        }
    }

    /// Sphere-vs-sphere pickup test against the player.
    pub fn touches(&self, orb_center: Vec3, player_center: Vec3, player_radius: f32) -> bool {
        let reach = self.radius + player_radius;
        orb_center.distance_squared(player_center) <= reach * reach
    }
}

impl Default for Orb {
    fn default() -> Self {
        Self::new()
    }
}

/// Marker: touching this box sends the player back to the checkpoint.
/// Lives on the Floor layer, so the ground probe can see it.
#[derive(Clone, Copy, Debug, Default)]
pub struct ResetSlab;

/// Marker: moving hazard box. Carries an empty collision layer so it never
/// blocks; overlap respawns the player instead.
#[derive(Clone, Copy, Debug, Default)]
pub struct Obstacle;
