use std::path::PathBuf;

use phaseshift::config::InputScript;
use phaseshift::engine::input::InputState;
use phaseshift::engine::time::PHYSICS_DT;
use phaseshift::{GameWorld, Recorder};

fn manifest_path(rel: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(rel)
}

fn run(game: &mut GameWorld, script: &InputScript, ticks: u32) -> Recorder {
    let mut input = InputState::new();
    let mut recorder = Recorder::new();
    for _ in 0..ticks {
        input.set_keys(script.keys_at(game.time()).iter().copied());
        game.tick(PHYSICS_DT, &input);
        recorder.capture(game);
    }
    recorder
}

#[test]
fn identical_runs_produce_identical_traces() {
    let script = InputScript::load(&manifest_path("scripts/hop_forward.ron")).unwrap();
    let level = manifest_path("levels/tutorial.ron");

    let first = run(&mut GameWorld::load(&level).unwrap(), &script, 300);
    let second = run(&mut GameWorld::load(&level).unwrap(), &script, 300);
    assert_eq!(first.len(), 300);
    assert_eq!(first.to_csv(), second.to_csv());
}

#[test]
fn reset_replays_the_same_trace() {
    let script = InputScript::load(&manifest_path("scripts/jump_in_place.toml")).unwrap();
    let mut game = GameWorld::load(&manifest_path("levels/phase_shift.ron")).unwrap();

    let first = run(&mut game, &script, 240);
    game.reset();
    let second = run(&mut game, &script, 240);
    assert_eq!(first.samples(), second.samples());
}
