//! Radial brush painting.
//!
//! A stroke accumulates "paint" per cell over time and blends from the
//! elevation captured at stroke start toward the tool's target. Blending
//! from that baseline instead of the live grid means overlapping passes
//! within one stroke converge on the target rather than ratcheting past it.

use crate::config::{BrushSize, BrushTool};
use crate::grid::Grid;

/// Longest elapsed time a single sample may account for.
pub const MAX_SAMPLE_MS: f32 = 100.0;

/// Per-cell bookkeeping for the stroke in progress.
#[derive(Clone, Debug)]
pub struct StrokeState {
    /// Elevation when the stroke began.
    pub baseline: Grid<f32>,
    /// Falloff-weighted dwell time, in units of full effect.
    pub accumulated: Grid<f32>,
    /// Smoothed maximum falloff strength seen this stroke.
    pub peak: Grid<f32>,
    active: bool,
}

impl StrokeState {
    pub fn new(size: usize) -> Self {
        Self {
            baseline: Grid::square(size),
            accumulated: Grid::square(size),
            peak: Grid::square(size),
            active: false,
        }
    }

    /// Reset accumulation and snapshot `elevation` as the new baseline.
    pub fn begin(&mut self, elevation: &Grid<f32>) {
        self.baseline.copy_from(elevation);
        self.accumulated.fill(0.0);
        self.peak.fill(0.0);
        self.active = true;
    }

    /// Mark the buffers stale. The next stroke overwrites them anyway.
    pub fn invalidate(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// Falloff: 1 inside `inner`, linear to 0 at `outer`. A zero-width ring
/// degenerates to a hard edge at `outer`.
#[inline]
pub fn brush_strength(distance: f32, inner: f32, outer: f32) -> f32 {
    if outer > inner {
        1.0 - ((distance - inner) / (outer - inner)).clamp(0.0, 1.0)
    } else if distance <= outer {
        1.0
    } else {
        0.0
    }
}

/// Paint one sample of a disc centered at normalized `(x0, y0)`.
/// Returns the number of cells touched.
pub fn paint_disc(
    elevation: &mut Grid<f32>,
    stroke: &mut StrokeState,
    tool: &BrushTool,
    x0: f32,
    y0: f32,
    size: &BrushSize,
    delta_time_ms: f32,
) -> usize {
    let n = elevation.size as i64;
    let dt = if delta_time_ms.is_nan() {
        0.0
    } else {
        delta_time_ms.clamp(0.0, MAX_SAMPLE_MS)
    };
    let target = tool.target_elevation;
    let BrushSize {
        inner_radius,
        outer_radius,
        rate,
    } = *size;
    if n == 0 || !(outer_radius >= 0.0) {
        return 0;
    }

    // Fraction of full effect this sample can deliver.
    let factor = rate / 1000.0 * dt;
    let factor = if factor.is_nan() {
        0.0
    } else {
        factor.clamp(0.0, 1.0)
    };

    // Bounds are worked out in float and clipped before any integer
    // conversion, so huge radii or far-off centers cannot overflow.
    let last = (n - 1) as f32;
    let xc = (x0 * n as f32).floor();
    let yc = (y0 * n as f32).floor();
    if !xc.is_finite() || !yc.is_finite() {
        return 0;
    }
    let r2 = outer_radius * outer_radius;

    let top = (yc - outer_radius).ceil();
    let bottom = (yc + outer_radius).floor();
    if bottom < 0.0 || top > last {
        return 0;
    }
    let top = top.max(0.0) as i64;
    let bottom = bottom.min(last) as i64;

    let mut touched = 0;
    for y in top..=bottom {
        let dy = y as f32 - yc;
        let s = (r2 - dy * dy).max(0.0).sqrt().floor();
        let left = xc - s;
        let right = xc + s;
        if right < 0.0 || left > last {
            continue;
        }
        let left = left.max(0.0) as i64;
        let right = right.min(last) as i64;
        for x in left..=right {
            let dx = x as f32 - xc;
            let distance = (dx * dx + dy * dy).sqrt();
            let strength = brush_strength(distance, inner_radius, outer_radius);

            let p = elevation.idx(x as usize, y as usize);
            let time = stroke.accumulated.data[p] + strength * factor;
            stroke.accumulated.data[p] = time;

            let mut peak = stroke.peak.data[p];
            if strength > peak {
                peak = (1.0 - factor) * peak + factor * strength;
                stroke.peak.data[p] = peak;
            }

            let baseline = stroke.baseline.data[p];
            let goal = if target.is_nan() {
                baseline
            } else {
                target.clamp(-1.0, 1.0)
            };
            let mix = (peak * time.min(1.0)).clamp(0.0, 1.0);
            elevation.data[p] = ((1.0 - mix) * baseline + mix * goal).clamp(-1.0, 1.0);
            touched += 1;
        }
    }
    touched
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh(size: usize) -> (Grid<f32>, StrokeState) {
        let grid = Grid::square(size);
        let mut stroke = StrokeState::new(size);
        stroke.begin(&grid);
        (grid, stroke)
    }

    #[test]
    fn strength_profile() {
        assert_eq!(brush_strength(0.0, 2.0, 6.0), 1.0);
        assert_eq!(brush_strength(2.0, 2.0, 6.0), 1.0);
        assert_eq!(brush_strength(4.0, 2.0, 6.0), 0.5);
        assert_eq!(brush_strength(6.0, 2.0, 6.0), 0.0);
        assert_eq!(brush_strength(9.0, 2.0, 6.0), 0.0);
    }

    #[test]
    fn degenerate_ring_is_a_hard_step() {
        assert_eq!(brush_strength(2.9, 3.0, 3.0), 1.0);
        assert_eq!(brush_strength(3.0, 3.0, 3.0), 1.0);
        assert_eq!(brush_strength(3.1, 3.0, 3.0), 0.0);
        assert!(brush_strength(1.0, 3.0, 3.0).is_finite());
    }

    #[test]
    fn touches_only_the_disc() {
        let (mut grid, mut stroke) = fresh(32);
        let tool = BrushTool { target_elevation: 1.0 };
        let size = BrushSize { inner_radius: 1.0, outer_radius: 3.0, rate: 5.0 };
        let touched = paint_disc(&mut grid, &mut stroke, &tool, 0.5, 0.5, &size, 16.0);
        // Scanline disc of radius 3: rows of half-width 0, 2, 2, 3, 2, 2, 0.
        assert_eq!(touched, 1 + 5 + 5 + 7 + 5 + 5 + 1);
        assert_eq!(grid.get(16 + 4, 16), 0.0);
        assert_eq!(grid.get(16 + 3, 16 + 1), 0.0);
    }

    #[test]
    fn clipped_at_grid_edges() {
        let (mut grid, mut stroke) = fresh(16);
        let tool = BrushTool { target_elevation: 1.0 };
        let size = BrushSize { inner_radius: 2.0, outer_radius: 6.0, rate: 8.0 };
        let touched = paint_disc(&mut grid, &mut stroke, &tool, 0.0, 0.0, &size, 50.0);
        assert!(touched > 0);
        assert!(grid.get(0, 0) > 0.0);
        let touched = paint_disc(&mut grid, &mut stroke, &tool, 0.999, 0.999, &size, 50.0);
        assert!(touched > 0);
        assert!(grid.get(15, 15) > 0.0);
    }

    #[test]
    fn elapsed_time_is_capped() {
        let tool = BrushTool { target_elevation: 1.0 };
        let size = BrushSize { inner_radius: 1.0, outer_radius: 2.0, rate: 1.0 };

        let (mut a, mut sa) = fresh(8);
        paint_disc(&mut a, &mut sa, &tool, 0.5, 0.5, &size, 100.0);
        let (mut b, mut sb) = fresh(8);
        paint_disc(&mut b, &mut sb, &tool, 0.5, 0.5, &size, 60_000.0);
        assert_eq!(a, b);
    }

    #[test]
    fn peak_is_smoothed_not_assigned() {
        let (mut grid, mut stroke) = fresh(16);
        let tool = BrushTool { target_elevation: 1.0 };
        let size = BrushSize { inner_radius: 2.0, outer_radius: 4.0, rate: 2.0 };
        paint_disc(&mut grid, &mut stroke, &tool, 0.5, 0.5, &size, 100.0);
        // factor = 0.2, strength = 1 at the center.
        let p = grid.idx(8, 8);
        assert!((stroke.peak.data[p] - 0.2).abs() < 1e-6);
        assert!((stroke.accumulated.data[p] - 0.2).abs() < 1e-6);
        assert!((grid.data[p] - 0.04).abs() < 1e-6);
    }

    #[test]
    fn target_is_clamped_into_range() {
        let (mut grid, mut stroke) = fresh(8);
        let tool = BrushTool { target_elevation: 7.0 };
        let size = BrushSize { inner_radius: 2.0, outer_radius: 3.0, rate: 10.0 };
        for _ in 0..20 {
            paint_disc(&mut grid, &mut stroke, &tool, 0.5, 0.5, &size, 100.0);
        }
        assert!(grid.data.iter().all(|e| (-1.0..=1.0).contains(e)));
        assert_eq!(grid.get(4, 4), 1.0);
    }

    #[test]
    fn huge_radius_covers_whole_grid() {
        let (mut grid, mut stroke) = fresh(16);
        let tool = BrushTool { target_elevation: 1.0 };
        let size = BrushSize { inner_radius: 1e20, outer_radius: 1e20, rate: 1000.0 };
        let touched = paint_disc(&mut grid, &mut stroke, &tool, 0.5, 0.5, &size, 100.0);
        assert_eq!(touched, 16 * 16);
        assert!(grid.data.iter().all(|&e| e == 1.0));
    }

    #[test]
    fn far_off_center_paints_nothing() {
        let (mut grid, mut stroke) = fresh(16);
        let tool = BrushTool { target_elevation: 1.0 };
        let size = BrushSize { inner_radius: 2.0, outer_radius: 6.0, rate: 8.0 };
        for (x0, y0) in [
            (1e30, 0.5),
            (-1e30, 0.5),
            (0.5, 1e30),
            (0.5, -1e30),
            (f32::INFINITY, 0.5),
            (f32::NAN, 0.5),
            (3.0, 3.0),
        ] {
            let touched = paint_disc(&mut grid, &mut stroke, &tool, x0, y0, &size, 100.0);
            assert_eq!(touched, 0, "({x0}, {y0})");
        }
        assert!(grid.data.iter().all(|&e| e == 0.0));
    }

    #[test]
    fn center_just_off_grid_clips_to_overlap() {
        let (mut grid, mut stroke) = fresh(16);
        let tool = BrushTool { target_elevation: 1.0 };
        let size = BrushSize { inner_radius: 2.0, outer_radius: 6.0, rate: 8.0 };
        // floor(-0.1 * 16) = -2: the center row reaches column 4, where falloff hits 0.
        let touched = paint_disc(&mut grid, &mut stroke, &tool, -0.1, 0.5, &size, 100.0);
        assert!(touched > 0);
        assert!(grid.get(0, 8) > 0.0);
        assert_eq!(grid.get(4, 8), 0.0);
    }

    #[test]
    fn nan_inputs_leave_grid_finite() {
        let (mut grid, mut stroke) = fresh(8);
        let size = BrushSize { inner_radius: 1.0, outer_radius: 3.0, rate: 5.0 };
        let tool = BrushTool { target_elevation: 1.0 };
        paint_disc(&mut grid, &mut stroke, &tool, 0.5, 0.5, &size, f32::NAN);
        let nan_rate = BrushSize { rate: f32::NAN, ..size };
        paint_disc(&mut grid, &mut stroke, &tool, 0.5, 0.5, &nan_rate, 50.0);
        let inf_rate = BrushSize { rate: f32::INFINITY, ..size };
        paint_disc(&mut grid, &mut stroke, &tool, 0.5, 0.5, &inf_rate, 0.0);
        assert!(grid.data.iter().all(|&e| e == 0.0));

        let nan_tool = BrushTool { target_elevation: f32::NAN };
        paint_disc(&mut grid, &mut stroke, &nan_tool, 0.5, 0.5, &size, 100.0);
        assert!(grid.data.iter().all(|&e| e == 0.0));
        assert!(stroke.accumulated.data.iter().all(|v| v.is_finite()));
        assert!(stroke.peak.data.iter().all(|v| v.is_finite()));
    }
}
