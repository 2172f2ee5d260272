pub mod config;
pub mod elevation;
pub mod engine;
pub mod error;
pub mod grid;
pub mod noise;
pub mod paint;
pub mod rng;

use std::time::Instant;

pub use config::{BrushSize, BrushTool, GRID_SIZE, GenerationParams};
pub use engine::ElevationEngine;
pub use error::{Error, Result};
pub use grid::Grid;
pub use noise::NoiseField;

pub struct Timing {
    pub name: &'static str,
    pub ms: f64,
}

/// Run `f`, appending its wall time to `timings` under `name`.
pub fn timed<T>(timings: &mut Vec<Timing>, name: &'static str, f: impl FnOnce() -> T) -> T {
    let t = Instant::now();
    let out = f();
    timings.push(Timing {
        name,
        ms: t.elapsed().as_secs_f64() * 1000.0,
    });
    out
}

/// A straight-line drag from `from` to `to`, sampled every `step_ms`.
/// Returns `(x, y, delta_ms)` samples in normalized coordinates; the first
/// sample carries the full `step_ms` like a fresh mouse-down would.
pub fn drag_samples(
    from: (f32, f32),
    to: (f32, f32),
    duration_ms: f32,
    step_ms: f32,
) -> Vec<(f32, f32, f32)> {
    let steps = (duration_ms / step_ms).ceil().max(1.0) as usize;
    (0..=steps)
        .map(|i| {
            let t = i as f32 / steps as f32;
            (
                from.0 + (to.0 - from.0) * t,
                from.1 + (to.1 - from.1) * t,
                step_ms,
            )
        })
        .collect()
}
