use std::path::Path;

use glam::Vec3;
use hecs::{Entity, World};

use crate::components::JumpKind;
use crate::config::ConfigError;
use crate::engine::input::InputState;
use crate::engine::time::FixedStep;
use crate::scene::{spawn_level, LevelConfig};
use crate::systems::{
    detect_ground, gather_colliders, hazard_check, orb_pickup_system, orbs_remaining,
    platform_motion_system, resolve_collisions, reset_orbs, rewind_motion_system,
    settle_to_ground, Hazard, PlayerController, TwinGroupRegistry,
};

/// Something that happened during a tick, for the caller to log, score or
/// draw.
#[derive(Clone, Debug, PartialEq)]
pub enum WorldEvent {
    Jumped(JumpKind),
    TwinToggled { group: u32 },
    OrbCollected { orb: Entity, position: Vec3, collected: usize, total: usize },
    Respawned { cause: Hazard, at: Vec3 },
    LevelComplete,
}

/// A loaded level and the player in it. Owns the scene, the player
/// controller and the twin registry, and runs the per-tick pipeline.
pub struct GameWorld {
    world: World,
    level: LevelConfig,
    controller: PlayerController,
    twins: TwinGroupRegistry,
    stepper: FixedStep,
    checkpoint: Vec3,
    orbs_total: usize,
    completed: bool,
    time: f32,
    ticks: u64,
}

impl GameWorld {
    pub fn new(level: LevelConfig) -> Self {
        let mut world = World::new();
        spawn_level(&mut world, &level);
        let twins = TwinGroupRegistry::from_world(&world);
        let orbs_total = orbs_remaining(&world);
        let controller = PlayerController::new(level.player_tuning(), level.player_start);

        let mut game = Self {
            world,
            checkpoint: level.player_start,
            level,
            controller,
            twins,
            stepper: FixedStep::default(),
            orbs_total,
            completed: false,
            time: 0.0,
            ticks: 0,
        };
        game.place_player(game.checkpoint);
        game
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Ok(Self::new(LevelConfig::load(path)?))
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn level(&self) -> &LevelConfig {
        &self.level
    }

    pub fn controller(&self) -> &PlayerController {
        &self.controller
    }

    pub fn twins(&self) -> &TwinGroupRegistry {
        &self.twins
    }

    pub fn gravity(&self) -> f32 {
        self.level.gravity
    }

    pub fn checkpoint(&self) -> Vec3 {
        self.checkpoint
    }

    pub fn orbs_collected(&self) -> usize {
        self.orbs_total - orbs_remaining(&self.world)
    }

    pub fn orbs_total(&self) -> usize {
        self.orbs_total
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    /// Simulated seconds since load or the last reset.
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Interpolation factor for drawing between the last two ticks.
    pub fn alpha(&self) -> f32 {
        self.stepper.alpha()
    }

    /// Run as many fixed ticks as `frame_dt` covers, with the same input
    /// held for all of them.
    pub fn advance(&mut self, frame_dt: f32, input: &InputState) -> Vec<WorldEvent> {
        let steps = self.stepper.advance(frame_dt);
        let mut events = Vec::new();
        for _ in 0..steps {
            events.extend(self.tick(self.stepper.step, input));
        }
        events
    }

    /// One simulation step. The order is fixed: platform motion, input,
    /// ground probe, integration, collision resolution, platform carry, jump
    /// event, then orbs and hazards.
    pub fn tick(&mut self, dt: f32, input: &InputState) -> Vec<WorldEvent> {
        let mut events = Vec::new();
        let gravity = self.level.gravity;

        platform_motion_system(&mut self.world, dt);
        let colliders = gather_colliders(&self.world);

        self.controller.handle_input(input);
        detect_ground(&mut self.controller, &colliders);
        let jump = self.controller.integrate(dt, gravity);
        resolve_collisions(&mut self.controller, &colliders);
        self.controller.apply_platform_carry(&colliders, dt);

        if jump.fired() {
            events.push(WorldEvent::Jumped(jump));
            for group in self.twins.on_jump(&mut self.world, jump) {
                events.push(WorldEvent::TwinToggled { group });
            }
        }

        self.collect_orbs(&mut events);

        let radius = self.controller.collision_radius();
        if let Some(cause) = hazard_check(&colliders, self.controller.position(), radius, self.level.kill_height) {
            self.respawn(cause, &mut events);
        }

        self.time += dt;
        self.ticks += 1;
        events
    }

    fn collect_orbs(&mut self, events: &mut Vec<WorldEvent>) {
        let picked = orb_pickup_system(
            &mut self.world,
            self.controller.position(),
            self.controller.collision_radius(),
        );
        if picked.is_empty() {
            return;
        }

        let collected = self.orbs_collected();
        let before = collected - picked.len();
        for (i, (orb, position)) in picked.into_iter().enumerate() {
            let collected = before + i + 1;
            self.checkpoint = position;
            log::info!("orb {collected}/{} collected at {position}", self.orbs_total);
            events.push(WorldEvent::OrbCollected {
                orb,
                position,
                collected,
                total: self.orbs_total,
            });
        }

        if !self.completed && collected == self.orbs_total {
            self.completed = true;
            log::info!("level '{}' complete in {:.2}s", self.level.name, self.time);
            events.push(WorldEvent::LevelComplete);
        }
    }

    fn respawn(&mut self, cause: Hazard, events: &mut Vec<WorldEvent>) {
        let at = self.checkpoint;
        log::info!("respawn at {at} ({cause:?})");
        self.place_player(at);
        events.push(WorldEvent::Respawned { cause, at });
    }

    /// Reset the player at `at` and drop it onto whatever is below.
    fn place_player(&mut self, at: Vec3) {
        self.controller.reset(at);
        let colliders = gather_colliders(&self.world);
        if !settle_to_ground(&mut self.controller, &colliders) {
            log::debug!("no ground within reach of {at}");
        }
    }

    /// Restore the level to its just-loaded state.
    pub fn reset(&mut self) {
        rewind_motion_system(&mut self.world);
        self.twins.reset(&mut self.world);
        reset_orbs(&mut self.world);
        self.stepper.reset();
        self.checkpoint = self.level.player_start;
        self.completed = false;
        self.time = 0.0;
        self.ticks = 0;
        self.place_player(self.checkpoint);
        log::info!("level '{}' reset", self.level.name);
    }
}

impl Default for GameWorld {
    /// An empty level: no geometry, default gravity.
    fn default() -> Self {
        Self::new(LevelConfig {
            name: String::from("Empty"),
            gravity: 9.8,
            player_start: Vec3::ZERO,
            kill_height: None,
            tuning: None,
            platforms: Vec::new(),
            twin_platforms: Vec::new(),
            orbs: Vec::new(),
            reset_slabs: Vec::new(),
            obstacles: Vec::new(),
        })
    }
}
