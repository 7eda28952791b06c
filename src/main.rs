use std::path::PathBuf;

use clap::Parser;
use phaseshift::engine::input::InputState;
use phaseshift::engine::time::PHYSICS_DT;
use phaseshift::{GameWorld, InputScript, Recorder, WorldEvent};

#[derive(Parser)]
#[command(name = "phaseshift", about = "Headless runner for phaseshift levels")]
struct Args {
    /// Level file (.ron or .toml)
    #[arg(long, default_value = "levels/tutorial.ron")]
    level: PathBuf,

    /// Simulated seconds to run
    #[arg(long, default_value_t = 10.0)]
    seconds: f32,

    /// Frame time fed to the fixed-step accumulator
    #[arg(long, default_value_t = PHYSICS_DT)]
    frame_dt: f32,

    /// Input script to play back; without one the player stands still
    #[arg(long)]
    script: Option<PathBuf>,

    /// Write a per-tick CSV trace of the player here
    #[arg(long)]
    trace: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Args::parse()) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    if !(args.frame_dt > 0.0) {
        return Err(format!("--frame-dt must be positive, got {}", args.frame_dt).into());
    }

    let mut game = GameWorld::load(&args.level)?;
    let script = match &args.script {
        Some(path) => InputScript::load(path)?,
        None => InputScript::default(),
    };
    let mut recorder = args.trace.as_ref().map(|_| Recorder::new());

    let mut input = InputState::new();
    let mut elapsed = 0.0_f32;
    let (mut jumps, mut respawns) = (0_u32, 0_u32);

    while elapsed < args.seconds && !game.is_complete() {
        input.set_keys(script.keys_at(elapsed).iter().copied());

        let ticks_before = game.ticks();
        for event in game.advance(args.frame_dt, &input) {
            match event {
                WorldEvent::Jumped(kind) => {
                    jumps += 1;
                    log::debug!("t={elapsed:.2} jump {kind:?}");
                }
                WorldEvent::TwinToggled { group } => log::debug!("t={elapsed:.2} twin group {group} toggled"),
                WorldEvent::Respawned { .. } => respawns += 1,
                WorldEvent::OrbCollected { .. } | WorldEvent::LevelComplete => {}
            }
        }
        if let Some(recorder) = recorder.as_mut() {
            if game.ticks() > ticks_before {
                recorder.capture(&game);
            }
        }
        elapsed += args.frame_dt;
    }

    if let (Some(recorder), Some(path)) = (&recorder, &args.trace) {
        recorder.save(path)?;
    }

    let pc = game.controller();
    println!("level:     {} (gravity {})", game.level().name, game.gravity());
    println!("simulated: {:.2}s ({} ticks)", game.time(), game.ticks());
    println!("orbs:      {}/{}", game.orbs_collected(), game.orbs_total());
    println!("jumps:     {jumps}");
    println!("respawns:  {respawns}");
    println!("position:  {}", pc.position());
    println!("state:     {}", pc.state().label());
    println!("complete:  {}", game.is_complete());
    Ok(())
}
