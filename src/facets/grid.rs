//! Dense sample grids aligned to world rectangles.

use glam::IVec2;
use thiserror::Error;

use crate::geometry::Rect2i;

/// Errors that can occur when constructing a grid.
#[derive(Error, Debug, PartialEq)]
pub enum GridError {
    #[error("Grid cell size must be at least 1")]
    ZeroCellSize,
    #[error("Grid expects {expected} samples but got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
}

/// Row-major samples covering `bounds`, each sample spanning a
/// `cell_size × cell_size` square of world units.
///
/// Sample squares are anchored in world space: sample `(i, j)` covers
/// `[i * cell_size, (i + 1) * cell_size)` on x (likewise y), whatever the
/// bounds. Grids of neighbouring regions therefore agree on every world
/// point. Lookups by world coordinate use nearest-neighbour (the sample
/// whose square contains the point).
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    bounds: Rect2i,
    cell_size: u32,
    /// Sample index of the first stored sample.
    origin: IVec2,
    width: u32,
    height: u32,
    values: Vec<T>,
}

/// Sample squares of size `cell_size` touched by `bounds`, in sample-index
/// space: `min()` is the index of the first square and the size is the
/// number of squares per axis.
pub fn sample_window(bounds: Rect2i, cell_size: u32) -> Rect2i {
    let cs = cell_size.max(1) as i32;
    let x0 = bounds.min_x.div_euclid(cs);
    let y0 = bounds.min_y.div_euclid(cs);
    if bounds.is_empty() {
        return Rect2i::new(x0, y0, 0, 0);
    }
    let x1 = (bounds.max_x() - 1).div_euclid(cs);
    let y1 = (bounds.max_y() - 1).div_euclid(cs);
    Rect2i::new(x0, y0, (x1 - x0) as u32 + 1, (y1 - y0) as u32 + 1)
}

impl<T: Copy> Grid<T> {
    /// Wraps existing samples. `values.len()` must match the sample dimensions.
    pub fn new(bounds: Rect2i, cell_size: u32, values: Vec<T>) -> Result<Self, GridError> {
        if cell_size == 0 {
            return Err(GridError::ZeroCellSize);
        }
        let window = sample_window(bounds, cell_size);
        let expected = window.area() as usize;
        if values.len() != expected {
            return Err(GridError::SizeMismatch { expected, actual: values.len() });
        }
        Ok(Self {
            bounds,
            cell_size,
            origin: window.min(),
            width: window.width,
            height: window.height,
            values,
        })
    }

    /// Builds a grid by evaluating `f` at the world-space top-left corner of
    /// every sample square. Corners of partially covered squares may lie
    /// outside `bounds`.
    pub fn from_fn(bounds: Rect2i, cell_size: u32, mut f: impl FnMut(i32, i32) -> T) -> Self {
        let cell_size = cell_size.max(1);
        let window = sample_window(bounds, cell_size);
        let cs = cell_size as i32;
        let mut values = Vec::with_capacity(window.area() as usize);
        for sy in window.min_y..window.max_y() {
            for sx in window.min_x..window.max_x() {
                values.push(f(sx.wrapping_mul(cs), sy.wrapping_mul(cs)));
            }
        }
        Self {
            bounds,
            cell_size,
            origin: window.min(),
            width: window.width,
            height: window.height,
            values,
        }
    }

    /// One sample per world unit, all equal to `value`.
    pub fn filled(bounds: Rect2i, value: T) -> Self {
        Self::from_fn(bounds, 1, |_, _| value)
    }

    pub fn bounds(&self) -> Rect2i {
        self.bounds
    }

    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    /// Sample index of the first stored sample.
    pub fn origin(&self) -> IVec2 {
        self.origin
    }

    /// Sample dimensions `(width, height)`.
    pub fn dims(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Sample at coordinates relative to [`origin`](Self::origin).
    pub fn get(&self, sx: u32, sy: u32) -> Option<T> {
        if sx >= self.width || sy >= self.height {
            return None;
        }
        self.values.get((sy * self.width + sx) as usize).copied()
    }

    /// Nearest-neighbour sample at a world coordinate, `None` outside `bounds`.
    pub fn sample(&self, wx: i32, wy: i32) -> Option<T> {
        if !self.bounds.contains(wx, wy) {
            return None;
        }
        let cs = self.cell_size as i32;
        let sx = wx.div_euclid(cs) - self.origin.x;
        let sy = wy.div_euclid(cs) - self.origin.y;
        self.get(sx as u32, sy as u32)
    }
}
