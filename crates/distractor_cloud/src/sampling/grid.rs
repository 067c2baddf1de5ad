//! Uniform background grid used to accelerate minimum-distance queries.
use glam::Vec2;

use crate::error::{Error, Result};
use crate::sampling::WrapMode;

/// Uniform grid over `[0, width) x [0, height)`.
///
/// The domain is split into a whole number of cells per axis, each no larger
/// than the requested cell size, so wrapped addressing never crosses a partial
/// cell. Each cell remembers the index of the last point registered in it. With
/// a cell size of `radius / sqrt(2)` a cell can never hold two points that are
/// at least `radius` apart, so a single slot per cell is enough for Poisson disk
/// rejection tests.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_extent: Vec2,
    columns: usize,
    rows: usize,
    wrap_mode: WrapMode,
    cells: Vec<Option<usize>>,
}

impl SpatialGrid {
    /// Create a grid covering `width` x `height` with cells of at most `cell_size` per side.
    pub fn new(width: f32, height: f32, cell_size: f32, wrap_mode: WrapMode) -> Result<Self> {
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(width) || !positive(height) {
            return Err(Error::InvalidDomain(format!(
                "grid extent must be > 0, got {width} x {height}"
            )));
        }
        if !positive(cell_size) {
            return Err(Error::InvalidDomain(format!(
                "cell_size must be > 0, got {cell_size}"
            )));
        }

        let columns = (width / cell_size).ceil().max(1.0) as usize;
        let rows = (height / cell_size).ceil().max(1.0) as usize;
        let len = columns.checked_mul(rows).ok_or_else(|| {
            Error::InvalidDomain(format!("grid of {columns} x {rows} cells is too large"))
        })?;

        Ok(Self {
            cell_extent: Vec2::new(width / columns as f32, height / rows as f32),
            columns,
            rows,
            wrap_mode,
            cells: vec![None; len],
        })
    }

    /// Create a grid whose cell size is derived from a minimum separation radius.
    pub fn for_radius(width: f32, height: f32, radius: f32, wrap_mode: WrapMode) -> Result<Self> {
        Self::new(width, height, radius / std::f32::consts::SQRT_2, wrap_mode)
    }

    /// Actual cell width and height.
    pub fn cell_extent(&self) -> Vec2 {
        self.cell_extent
    }

    /// Cell radius of a window that contains every cell within `distance` of a point.
    pub fn window_radius_for(&self, distance: f32) -> usize {
        (distance / self.cell_extent.min_element()).ceil().max(1.0) as usize
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell coordinates for a point, saturated to the grid.
    #[inline]
    pub fn cell_coords(&self, point: Vec2) -> (usize, usize) {
        let x = ((point.x / self.cell_extent.x).floor() as isize).clamp(0, self.columns as isize - 1);
        let y = ((point.y / self.cell_extent.y).floor() as isize).clamp(0, self.rows as isize - 1);
        (x as usize, y as usize)
    }

    /// Flat cell index for a point.
    #[inline]
    pub fn cell_index_for(&self, point: Vec2) -> usize {
        let (x, y) = self.cell_coords(point);
        y * self.columns + x
    }

    /// Point index registered in `cell`, if any.
    #[inline]
    pub fn get(&self, cell: usize) -> Option<usize> {
        self.cells.get(cell).copied().flatten()
    }

    /// Register `point_index` in `cell`, replacing any previous occupant.
    #[inline]
    pub fn set(&mut self, cell: usize, point_index: usize) {
        if let Some(slot) = self.cells.get_mut(cell) {
            *slot = Some(point_index);
        }
    }

    /// Forget all registered points.
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    /// Registered point indices in the `(2 * cell_radius + 1)^2` block around `point`.
    ///
    /// With [`WrapMode::WrapAround`] the block wraps across the grid edges;
    /// with [`WrapMode::Clamp`] cells outside the grid are skipped.
    pub fn neighbors_in_window(
        &self,
        point: Vec2,
        cell_radius: usize,
    ) -> impl Iterator<Item = usize> + '_ {
        let r = cell_radius as isize;
        let (cx, cy) = self.cell_coords(point);
        let (cx, cy) = (cx as isize, cy as isize);

        (-r..=r)
            .flat_map(move |dy| (-r..=r).map(move |dx| (cx + dx, cy + dy)))
            .filter_map(move |(x, y)| self.resolve(x, y))
            .filter_map(move |cell| self.cells[cell])
    }

    #[inline]
    fn resolve(&self, x: isize, y: isize) -> Option<usize> {
        let (w, h) = (self.columns as isize, self.rows as isize);
        let (x, y) = match self.wrap_mode {
            WrapMode::WrapAround => (x.rem_euclid(w), y.rem_euclid(h)),
            WrapMode::Clamp => {
                if x < 0 || y < 0 || x >= w || y >= h {
                    return None;
                }
                (x, y)
            }
        };
        Some((y * w + x) as usize)
    }
}
