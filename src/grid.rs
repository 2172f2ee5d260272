/// Row-major flat square grid. No per-cell objects, f32 friendly.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    pub data: Vec<T>,
    pub size: usize,
}

impl<T: Copy + Default> Grid<T> {
    pub fn square(size: usize) -> Self {
        Self {
            data: vec![T::default(); size * size],
            size,
        }
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.size && y < self.size);
        y * self.size + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> T {
        self.data[self.idx(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: T) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }

    pub fn fill(&mut self, v: T) {
        self.data.fill(v);
    }

    /// Overwrite every cell with `other`'s. Both grids must share a size.
    pub fn copy_from(&mut self, other: &Grid<T>) {
        debug_assert_eq!(self.size, other.size);
        self.data.copy_from_slice(&other.data);
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}
