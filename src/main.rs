use wasm_bird::{AnimatedBird, BirdConfig, Recorder, Side};

const FRAMES: u32 = 300;

/// Vertical extent of the wing tip over a run.
#[derive(Debug, Clone, Copy, PartialEq)]
struct TipRange {
    min_y: f64,
    max_y: f64,
}

impl TipRange {
    fn new() -> Self {
        Self { min_y: f64::MAX, max_y: f64::MIN }
    }

    fn observe(&mut self, y: f64) {
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);
    }
}

fn main() -> anyhow::Result<()> {
    let mut surface = Recorder::new(600.0, 300.0);

    let config = BirdConfig {
        variable_speed: true,
        ..Default::default()
    };
    let mut bird = AnimatedBird::with_config(&surface, 200.0, 100.0, Some(200.0), Some(50.0), config);
    bird.init(&mut surface);

    let mut tip = TipRange::new();

    for frame in 0..FRAMES {
        surface.clear();
        bird.frame(f64::from(frame) * 16.0, &mut surface);

        anyhow::ensure!(
            surface.fills() == 5,
            "frame {frame} filled {} paths",
            surface.fills()
        );

        tip.observe(bird.wing(Side::Left)[4].y);
    }

    eprintln!(
        "{FRAMES} frames, wing tip between y={:.1} and y={:.1}, rate {:.4}",
        tip.min_y,
        tip.max_y,
        bird.update_rate()
    );

    Ok(())
}
