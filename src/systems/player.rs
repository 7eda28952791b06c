use glam::Vec3;
use hecs::Entity;

use crate::components::{Collidable, JumpKind, PlayerState};
use crate::config::PlayerTuning;
use crate::engine::input::{InputState, Key};
use crate::fsm::StateMachine;

/// Fraction of the jump velocity a wall jump gets.
const WALL_JUMP_VERTICAL_FACTOR: f32 = 0.9;

// ---------------------------------------------------------------------------
// Player data
// ---------------------------------------------------------------------------

/// The player's kinematic state and timers. Read freely; only
/// [`PlayerController`] writes it.
#[derive(Clone, Debug)]
pub struct Player {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Facing, radians about +Y.
    pub yaw: f32,
    target_yaw: f32,
    pub touching_wall: bool,
    pub wall_normal: Vec3,
    pub wall_jump_cooldown: f32,
    pub wall_jump_momentum_lock: f32,
    pub wall_cling_timer: f32,
    /// Time left on a remembered jump press.
    pub jump_buffer: f32,
    /// Moving platform the player stands on, if any.
    pub carried_by: Option<Entity>,
}

impl Player {
    fn at(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            yaw: 0.0,
            target_yaw: 0.0,
            touching_wall: false,
            wall_normal: Vec3::ZERO,
            wall_jump_cooldown: 0.0,
            wall_jump_momentum_lock: 0.0,
            wall_cling_timer: 0.0,
            jump_buffer: 0.0,
            carried_by: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Owns the player and applies every change to it: input, jumps, gravity,
/// friction, and the contact results the movement resolver reports.
///
/// Per tick the world calls, in order: [`handle_input`](Self::handle_input),
/// `detect_ground`, [`integrate`](Self::integrate), `resolve_collisions`,
/// [`apply_platform_carry`](Self::apply_platform_carry).
#[derive(Clone, Debug)]
pub struct PlayerController {
    player: Player,
    fsm: StateMachine<PlayerState>,
    tuning: PlayerTuning,
    jump_was_held: bool,
    fresh_jump_press: bool,
}

impl PlayerController {
    pub fn new(tuning: PlayerTuning, spawn: Vec3) -> Self {
        Self {
            player: Player::at(spawn),
            fsm: StateMachine::new(PlayerState::Airborne { jumped: false }),
            tuning,
            jump_was_held: false,
            fresh_jump_press: false,
        }
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn tuning(&self) -> &PlayerTuning {
        &self.tuning
    }

    pub fn state(&self) -> PlayerState {
        self.fsm.state
    }

    pub fn position(&self) -> Vec3 {
        self.player.position
    }

    pub fn velocity(&self) -> Vec3 {
        self.player.velocity
    }

    pub fn collision_radius(&self) -> f32 {
        self.tuning.collision_radius()
    }

    pub fn is_grounded(&self) -> bool {
        self.fsm.state == PlayerState::Grounded
    }

    pub fn touching_wall(&self) -> bool {
        self.player.touching_wall
    }

    pub fn wall_normal(&self) -> Vec3 {
        self.player.wall_normal
    }

    /// Put the player back at `position` with every timer cleared
    /// (spawn and respawn). The instance is reused, not rebuilt.
    pub fn reset(&mut self, position: Vec3) {
        self.player = Player::at(position);
        self.fsm.reset(PlayerState::Airborne { jumped: false });
        self.jump_was_held = false;
        self.fresh_jump_press = false;
    }

    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.player.velocity = velocity;
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    /// Read one tick of input. Jumps are edge-triggered: holding the key
    /// does nothing after the first tick.
    pub fn handle_input(&mut self, input: &InputState) {
        let jump_held = input.is_key_held(Key::Jump);
        self.fresh_jump_press = jump_held && !self.jump_was_held;
        if self.fresh_jump_press {
            self.player.jump_buffer = self.tuning.jump_buffer;
        }
        self.jump_was_held = jump_held;

        let dir = input.move_direction();
        let locked = self.player.wall_jump_momentum_lock > 0.0;
        if dir != Vec3::ZERO {
            if !locked {
                self.player.velocity.x = dir.x * self.tuning.speed;
                self.player.velocity.z = dir.z * self.tuning.speed;
            }
            self.player.target_yaw = dir.x.atan2(dir.z);
        } else if !locked {
            self.player.velocity.x = 0.0;
            self.player.velocity.z = 0.0;
        }
    }

    // -----------------------------------------------------------------------
    // Integration
    // -----------------------------------------------------------------------

    /// Timers, jump, gravity, friction and position update for one tick.
    /// Must run after `detect_ground`. Returns the jump executed, if any.
    pub fn integrate(&mut self, dt: f32, gravity: f32) -> JumpKind {
        self.fsm.tick(dt);
        self.tick_timers(dt);

        let jump = self.try_jump();

        let p = &mut self.player;
        p.velocity.y -= gravity * dt;

        if self.fsm.state == PlayerState::Grounded && p.wall_jump_momentum_lock <= 0.0 {
            let damping = (1.0 - self.tuning.ground_friction * dt).max(0.0);
            p.velocity.x *= damping;
            p.velocity.z *= damping;
        }

        p.position += p.velocity * dt;
        p.jump_buffer = (p.jump_buffer - dt).max(0.0);
        self.fresh_jump_press = false;

        self.turn_toward_target(dt);
        jump
    }

    /// `handle_input` followed by `integrate`.
    pub fn update(&mut self, input: &InputState, dt: f32, gravity: f32) -> JumpKind {
        self.handle_input(input);
        self.integrate(dt, gravity)
    }

    fn tick_timers(&mut self, dt: f32) {
        let p = &mut self.player;
        if p.wall_jump_cooldown > 0.0 {
            p.wall_jump_cooldown -= dt;
        }
        if p.wall_jump_momentum_lock > 0.0 {
            p.wall_jump_momentum_lock -= dt;
        }
        if p.wall_cling_timer > 0.0 {
            p.wall_cling_timer -= dt;
            if p.wall_cling_timer > 0.0 {
                p.touching_wall = true;
            }
        }
    }

    /// Ground jumps honour coyote time and the jump buffer. Wall jumps need a
    /// press on this very tick; a gated press is dropped.
    fn try_jump(&mut self) -> JumpKind {
        if self.player.jump_buffer <= 0.0 {
            return JumpKind::None;
        }

        if self.can_ground_jump() {
            let p = &mut self.player;
            p.velocity.y = self.tuning.jump_velocity;
            p.carried_by = None;
            p.jump_buffer = 0.0;
            self.fsm.force_go(PlayerState::Airborne { jumped: true });
            log::debug!("ground jump at {:?}", self.player.position);
            return JumpKind::Ground;
        }

        if self.fresh_jump_press
            && self.player.touching_wall
            && self.player.wall_jump_cooldown <= 0.0
        {
            let t = &self.tuning;
            let p = &mut self.player;
            p.velocity.y = t.jump_velocity * WALL_JUMP_VERTICAL_FACTOR;
            p.velocity.x = p.wall_normal.x * t.wall_jump_horizontal;
            p.velocity.z = p.wall_normal.z * t.wall_jump_horizontal;
            p.wall_jump_cooldown = t.wall_jump_cooldown;
            p.wall_jump_momentum_lock = t.wall_jump_momentum_lock;
            p.jump_buffer = 0.0;
            self.fsm.force_go(PlayerState::Airborne { jumped: true });
            log::debug!("wall jump off {:?}", self.player.wall_normal);
            return JumpKind::Wall;
        }

        JumpKind::None
    }

    fn can_ground_jump(&self) -> bool {
        match self.fsm.state {
            PlayerState::Grounded => true,
            PlayerState::Airborne { jumped: false } => {
                self.fsm.previous == PlayerState::Grounded
                    && self.fsm.elapsed <= self.tuning.coyote_time
            }
            PlayerState::Airborne { jumped: true } => false,
        }
    }

    fn turn_toward_target(&mut self, dt: f32) {
        use std::f32::consts::{PI, TAU};
        let p = &mut self.player;
        let diff = (p.target_yaw - p.yaw + PI).rem_euclid(TAU) - PI;
        p.yaw += diff * (self.tuning.turn_rate * dt).min(1.0);
    }

    /// Move with the platform the player stands on. Runs after collision
    /// resolution.
    pub fn apply_platform_carry<C: Collidable>(&mut self, colliders: &[C], dt: f32) {
        if !self.is_grounded() {
            return;
        }
        let Some(platform) = self.player.carried_by else {
            return;
        };
        let carry = colliders
            .iter()
            .find(|c| c.entity() == platform)
            .and_then(Collidable::carry_velocity);
        if let Some(v) = carry {
            self.player.position += v * dt;
        }
    }

    // -----------------------------------------------------------------------
    // Contact results, reported by the movement resolver
    // -----------------------------------------------------------------------

    /// Ground probe found solid floor. `carrier` is the moving platform
    /// underfoot, if any.
    pub(crate) fn land(&mut self, carrier: Option<Entity>) {
        if self.fsm.go(PlayerState::Grounded) {
            log::debug!("landed at {:?}", self.player.position);
        }
        self.player.carried_by = carrier;
    }

    /// Ground probe found nothing.
    pub(crate) fn lose_ground(&mut self) {
        self.fsm.go(PlayerState::Airborne { jumped: false });
        self.player.carried_by = None;
    }

    /// Mark grounded without touching the carried platform.
    pub(crate) fn mark_grounded(&mut self) {
        self.fsm.go(PlayerState::Grounded);
    }

    /// Snap the sphere bottom onto a floor at height `floor_y`.
    pub(crate) fn snap_to_floor(&mut self, floor_y: f32) {
        self.player.position.y = floor_y + self.collision_radius();
        self.player.velocity.y = 0.0;
    }

    pub(crate) fn push_out_of_floor(&mut self, offset: Vec3) {
        self.player.position += offset;
        if self.player.velocity.y < 0.0 {
            self.player.velocity.y = 0.0;
        }
    }

    pub(crate) fn hit_ceiling(&mut self, offset: Vec3) {
        self.player.position += offset;
        if self.player.velocity.y > 0.0 {
            self.player.velocity.y = 0.0;
        }
    }

    /// Push off a wall and slide: the horizontal velocity component heading
    /// into the wall is removed.
    pub(crate) fn hit_wall(&mut self, normal: Vec3, offset: Vec3) {
        self.player.position += offset;
        self.touch_wall(normal);

        let horizontal = Vec3::new(normal.x, 0.0, normal.z);
        let len = horizontal.length();
        if len > super::collision::MIN_NORMAL_LENGTH {
            let n = horizontal / len;
            let v = &mut self.player.velocity;
            let into = v.x * n.x + v.z * n.z;
            if into < 0.0 {
                v.x -= n.x * into;
                v.z -= n.z * into;
            }
        }
    }

    /// Record wall contact and restart the cling window.
    pub(crate) fn touch_wall(&mut self, normal: Vec3) {
        self.player.touching_wall = true;
        self.player.wall_normal = normal;
        self.player.wall_cling_timer = self.tuning.wall_cling_time;
    }

    /// Clear wall contact at the start of resolution.
    pub(crate) fn clear_wall_contact(&mut self) {
        self.player.touching_wall = false;
    }
}
