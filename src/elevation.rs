use rayon::prelude::*;
use serde::Serialize;

use crate::config::GenerationParams;
use crate::grid::Grid;
use crate::noise::NoiseField;

// Ridge mask sample offsets and mountain shaping constants. Tuned by eye;
// changing them changes every generated map.
const RIDGE_OFFSET_A: (f64, f64) = (30.0, 50.0);
const RIDGE_OFFSET_B: (f64, f64) = (33.0, 55.0);
const MOUNTAIN_RAMP: f64 = 5.0;
const MOUNTAIN_CAP: f64 = 3.0;
const RIDGE_WIDTH: f64 = 0.5;

/// Map a cell index onto `[-1, 1)`.
#[inline]
pub fn normalized(i: usize, size: usize) -> f64 {
    2.0 * i as f64 / size as f64 - 1.0
}

/// Elevation before mountain shaping: fBm plus the island bowl, clamped.
/// The bowl uses Chebyshev distance so coastlines come out squarish.
#[inline]
pub fn base_elevation(noise: &NoiseField, nx: f64, ny: f64, islandness: f64) -> f64 {
    let distance = nx.abs().max(ny.abs());
    let bowl = 0.75 - 2.0 * distance * distance;
    let e = 0.5 * (noise.fbm(nx, ny) + islandness * bowl);
    e.clamp(-1.0, 1.0)
}

/// Raise land along ridges. Never lowers `e`, and water passes through.
#[inline]
pub fn mountain_shape(noise: &NoiseField, nx: f64, ny: f64, e: f64) -> f64 {
    if e <= 0.0 {
        return e;
    }
    let m = 0.5 * noise.sample2d(nx + RIDGE_OFFSET_A.0, ny + RIDGE_OFFSET_A.1)
        + 0.5 * noise.sample2d(2.0 * nx + RIDGE_OFFSET_B.0, 2.0 * ny + RIDGE_OFFSET_B.1);
    let mountain = (e * MOUNTAIN_RAMP).min(1.0) * (1.0 - m.abs() / RIDGE_WIDTH);
    if mountain > 0.0 {
        e.max((e * MOUNTAIN_CAP).min(mountain)).clamp(-1.0, 1.0)
    } else {
        e
    }
}

/// Build the full elevation grid for `params`. Rows are filled in parallel;
/// every cell depends only on its own coordinates, so the result does not
/// depend on scheduling.
pub fn build_elevation(size: usize, params: &GenerationParams) -> Grid<f32> {
    let noise = NoiseField::new(params.seed);
    let islandness = params.islandness;

    let mut height = Grid::<f32>::square(size);
    height
        .data
        .par_chunks_mut(size)
        .enumerate()
        .for_each(|(y, row)| {
            let ny = normalized(y, size);
            for (x, cell) in row.iter_mut().enumerate() {
                let nx = normalized(x, size);
                let e = base_elevation(&noise, nx, ny, islandness);
                *cell = mountain_shape(&noise, nx, ny, e) as f32;
            }
        });

    height
}

/// Summary numbers for logging and diagnostics.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct ElevationStats {
    pub min: f32,
    pub max: f32,
    pub mean: f32,
    pub land_fraction: f32,
    /// Mean over the central quarter-width square.
    pub center_mean: f32,
    /// Mean over the four corner squares of the same width.
    pub corner_mean: f32,
}

pub fn summarize(height: &Grid<f32>) -> ElevationStats {
    let n = height.size;
    let total = height.data.len().max(1) as f32;
    let (min, max, sum, land) = height.data.iter().fold(
        (f32::MAX, f32::MIN, 0.0f32, 0usize),
        |(lo, hi, s, l), &e| (lo.min(e), hi.max(e), s + e, l + (e >= 0.0) as usize),
    );

    let band = (n / 4).max(1);
    let lo = (n - band) / 2;
    let mean_over = |xs: std::ops::Range<usize>, ys: std::ops::Range<usize>| {
        let mut s = 0.0f32;
        let mut c = 0usize;
        for y in ys {
            for x in xs.clone() {
                s += height.get(x, y);
                c += 1;
            }
        }
        (s, c)
    };

    let (cs, cc) = mean_over(lo..lo + band, lo..lo + band);
    let far = n - band;
    let corners = [
        mean_over(0..band, 0..band),
        mean_over(far..n, 0..band),
        mean_over(0..band, far..n),
        mean_over(far..n, far..n),
    ];
    let (ks, kc) = corners
        .iter()
        .fold((0.0f32, 0usize), |(s, c), (ds, dc)| (s + ds, c + dc));

    ElevationStats {
        min,
        max,
        mean: sum / total,
        land_fraction: land as f32 / total,
        center_mean: cs / cc.max(1) as f32,
        corner_mean: ks / kc.max(1) as f32,
    }
}
