use std::time::Instant;

use tracing::{debug, trace};

use crate::config::{BrushSize, BrushTool, GRID_SIZE, GenerationParams};
use crate::elevation::build_elevation;
use crate::error::{Error, Result};
use crate::grid::Grid;
use crate::paint::{StrokeState, paint_disc};

/// Owns the elevation grid and everything that mutates it.
///
/// Elevations lie in `[-1, 1]`: negative is water, non-negative is land.
/// The grid is replaced wholesale by [`generate`](Self::generate) and edited
/// in place by [`paint_at`](Self::paint_at). Not internally synchronized;
/// share it behind a lock.
#[derive(Clone, Debug)]
pub struct ElevationEngine {
    params: GenerationParams,
    elevation: Grid<f32>,
    stroke: StrokeState,
    painted: bool,
}

impl ElevationEngine {
    /// Engine with a `size`×`size` grid generated from default params.
    pub fn new(size: usize) -> Result<Self> {
        Self::with_params(size, GenerationParams::default())
    }

    pub fn with_params(size: usize, params: GenerationParams) -> Result<Self> {
        if size == 0 {
            return Err(Error::InvalidGridSize(size));
        }
        Ok(Self::build(size, params))
    }

    fn build(size: usize, params: GenerationParams) -> Self {
        let mut engine = Self {
            params,
            elevation: Grid::square(size),
            stroke: StrokeState::new(size),
            painted: false,
        };
        engine.generate();
        engine
    }

    pub fn size(&self) -> usize {
        self.elevation.size
    }

    pub fn params(&self) -> GenerationParams {
        self.params
    }

    /// Store `params` and regenerate, unless they equal the current ones.
    /// Returns whether a regeneration happened.
    pub fn set_params(&mut self, params: GenerationParams) -> bool {
        if params == self.params {
            trace!(?params, "params unchanged, skipping regeneration");
            return false;
        }
        self.params = params;
        self.generate();
        true
    }

    /// Recompute the whole grid from the stored params, discarding paint.
    pub fn generate(&mut self) {
        let t = Instant::now();
        self.elevation = build_elevation(self.size(), &self.params);
        self.stroke.invalidate();
        self.painted = false;
        debug!(
            seed = self.params.seed,
            islandness = self.params.islandness,
            size = self.size(),
            ms = t.elapsed().as_secs_f64() * 1000.0,
            "generated elevation"
        );
    }

    /// Start a paint gesture. Must be called once before the first
    /// [`paint_at`](Self::paint_at) of every gesture; it snapshots the grid
    /// that the gesture's samples blend from.
    pub fn begin_stroke(&mut self) {
        self.stroke.begin(&self.elevation);
        debug!("stroke started");
    }

    /// Whether a gesture has begun since the last regeneration.
    pub fn stroke_in_progress(&self) -> bool {
        self.stroke.is_active()
    }

    /// Apply one brush sample at normalized `(x0, y0)` in `[0, 1]²`.
    ///
    /// `delta_time_ms` is the time since the previous sample (or since the
    /// gesture began) and is capped at 100 ms.
    pub fn paint_at(
        &mut self,
        tool: &BrushTool,
        x0: f32,
        y0: f32,
        size: &BrushSize,
        delta_time_ms: f32,
    ) {
        debug_assert!(
            self.stroke.is_active(),
            "paint_at called without begin_stroke"
        );
        let touched = paint_disc(
            &mut self.elevation,
            &mut self.stroke,
            tool,
            x0,
            y0,
            size,
            delta_time_ms,
        );
        self.painted = true;
        trace!(x0, y0, delta_time_ms, touched, "paint sample");
    }

    /// Row-major view of the grid, `size * size` values.
    pub fn elevation(&self) -> &[f32] {
        self.elevation.as_slice()
    }

    pub fn elevation_grid(&self) -> &Grid<f32> {
        &self.elevation
    }

    /// Replace the grid with caller-supplied values, e.g. a restored map.
    /// Values are clamped to `[-1, 1]` and count as unsaved edits. Any
    /// stroke in progress is closed.
    pub fn replace_elevation(&mut self, values: &[f32]) -> Result<()> {
        let expected = self.elevation.data.len();
        if values.len() != expected {
            return Err(Error::GridLengthMismatch {
                expected,
                got: values.len(),
            });
        }
        for (cell, &v) in self.elevation.data.iter_mut().zip(values) {
            *cell = v.clamp(-1.0, 1.0);
        }
        self.stroke.invalidate();
        self.painted = true;
        debug!(cells = expected, "elevation replaced");
        Ok(())
    }

    /// True once any paint has been applied since the last regeneration.
    pub fn has_unsaved_paint(&self) -> bool {
        self.painted
    }
}

impl Default for ElevationEngine {
    fn default() -> Self {
        Self::build(GRID_SIZE, GenerationParams::default())
    }
}
