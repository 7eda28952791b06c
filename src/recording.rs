use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use glam::Vec3;

use crate::app::GameWorld;

const HEADER: &str = "tick,time,px,py,pz,vx,vy,vz,grounded,wall,state";

/// Player state after one tick.
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    pub tick: u64,
    pub time: f32,
    pub position: Vec3,
    pub velocity: Vec3,
    pub grounded: bool,
    pub touching_wall: bool,
    pub state: &'static str,
}

impl Sample {
    pub fn capture(game: &GameWorld) -> Self {
        let pc = game.controller();
        Self {
            tick: game.ticks(),
            time: game.time(),
            position: pc.position(),
            velocity: pc.velocity(),
            grounded: pc.is_grounded(),
            touching_wall: pc.touching_wall(),
            state: pc.state().label(),
        }
    }

    fn write_row<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let (p, v) = (self.position, self.velocity);
        writeln!(
            out,
            "{},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6},{},{},{}",
            self.tick,
            self.time,
            p.x,
            p.y,
            p.z,
            v.x,
            v.y,
            v.z,
            u8::from(self.grounded),
            u8::from(self.touching_wall),
            self.state
        )
    }
}

/// Per-tick trace of the player, written out as CSV.
#[derive(Clone, Debug, Default)]
pub struct Recorder {
    samples: Vec<Sample>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn capture(&mut self, game: &GameWorld) {
        self.samples.push(Sample::capture(game));
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn write_csv<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{HEADER}")?;
        for sample in &self.samples {
            sample.write_row(out)?;
        }
        Ok(())
    }

    pub fn to_csv(&self) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self.write_csv(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        self.write_csv(&mut out)?;
        out.flush()?;
        log::info!("wrote {} trace samples to {}", self.samples.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::InputState;
    use crate::engine::time::PHYSICS_DT;

    #[test]
    fn csv_has_header_and_one_row_per_tick() {
        let mut game = GameWorld::default();
        let idle = InputState::new();
        let mut recorder = Recorder::new();
        for _ in 0..3 {
            game.tick(PHYSICS_DT, &idle);
            recorder.capture(&game);
        }

        let csv = recorder.to_csv();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], HEADER);
        assert!(lines[1].starts_with("1,"));
        assert!(lines[3].ends_with(",0,0,Airborne(fall)"));
    }

    #[test]
    fn samples_follow_the_player() {
        let mut game = GameWorld::default();
        game.tick(PHYSICS_DT, &InputState::new());
        let sample = Sample::capture(&game);
        assert_eq!(sample.tick, 1);
        assert!(sample.velocity.y < 0.0);
        assert!(!sample.grounded);
    }
}
