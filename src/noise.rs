use crate::rng::Rng;

/// Number of octaves summed by [`NoiseField::fbm`].
pub const OCTAVES: u32 = 5;
/// Amplitude ratio between successive octaves.
pub const PERSISTENCE: f64 = 0.5;

// Skew/unskew factors for the 2D simplex lattice.
const F2: f64 = 0.366_025_403_784_438_6; // 0.5 * (sqrt(3) - 1)
const G2: f64 = 0.211_324_865_405_187_1; // (3 - sqrt(3)) / 6

const GRAD3: [[f64; 2]; 12] = [
    [1.0, 1.0],
    [-1.0, 1.0],
    [1.0, -1.0],
    [-1.0, -1.0],
    [1.0, 0.0],
    [-1.0, 0.0],
    [1.0, 0.0],
    [-1.0, 0.0],
    [0.0, 1.0],
    [0.0, -1.0],
    [0.0, 1.0],
    [0.0, -1.0],
];

/// Seeded 2D simplex noise. Built once per generation pass and shared
/// read-only across worker threads; sampling never mutates it.
#[derive(Clone)]
pub struct NoiseField {
    perm: [u8; 512],
}

impl NoiseField {
    pub fn new(seed: u64) -> Self {
        let mut p: [u8; 256] = std::array::from_fn(|i| i as u8);
        Rng::new(seed).shuffle(&mut p);
        let perm = std::array::from_fn(|i| p[i & 255]);
        Self { perm }
    }

    #[inline]
    fn corner(&self, ii: usize, jj: usize, x: f64, y: f64) -> f64 {
        let t = 0.5 - x * x - y * y;
        if t < 0.0 {
            return 0.0;
        }
        let gi = self.perm[ii + self.perm[jj] as usize] as usize % 12;
        let g = GRAD3[gi];
        let t = t * t;
        t * t * (g[0] * x + g[1] * y)
    }

    /// Coherent noise in `[-1, 1]` at continuous coordinates.
    pub fn sample2d(&self, x: f64, y: f64) -> f64 {
        let s = (x + y) * F2;
        let i = (x + s).floor();
        let j = (y + s).floor();
        let t = (i + j) * G2;
        let x0 = x - (i - t);
        let y0 = y - (j - t);

        let (i1, j1) = if x0 > y0 { (1, 0) } else { (0, 1) };
        let x1 = x0 - i1 as f64 + G2;
        let y1 = y0 - j1 as f64 + G2;
        let x2 = x0 - 1.0 + 2.0 * G2;
        let y2 = y0 - 1.0 + 2.0 * G2;

        let ii = (i as i64 & 255) as usize;
        let jj = (j as i64 & 255) as usize;

        let n0 = self.corner(ii, jj, x0, y0);
        let n1 = self.corner(ii + i1, jj + j1, x1, y1);
        let n2 = self.corner(ii + 1, jj + 1, x2, y2);

        (70.0 * (n0 + n1 + n2)).clamp(-1.0, 1.0)
    }

    /// Fractal Brownian motion: octave `k` samples at frequency `2^k` with
    /// amplitude `PERSISTENCE^k`, normalized by the summed amplitudes.
    pub fn fbm(&self, x: f64, y: f64) -> f64 {
        let mut sum = 0.0;
        let mut norm = 0.0;
        let mut amp = 1.0;
        for octave in 0..OCTAVES {
            let freq = (1u32 << octave) as f64;
            sum += amp * self.sample2d(x * freq, y * freq);
            norm += amp;
            amp *= PERSISTENCE;
        }
        sum / norm
    }
}
