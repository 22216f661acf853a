//! A fractal field holds the escape time of every cell in a viewport.

use crate::escape::{escape_time, Limits, Mode};
use crate::viewport::{Pos, Viewport};
use crate::Formula;
use indicatif::ParallelProgressIterator;
use itertools::Itertools;
use rayon::prelude::*;

/// Escape times for a whole grid.
///
/// Rows are grid `y`, columns are grid `x`. Values lie in `[0, max_iter]`, where `max_iter`
/// marks a cell that never escaped.
#[derive(Debug, Clone, PartialEq)]
pub struct FractalField {
    counts: nalgebra::DMatrix<u32>,
    max_iter: u32,
}

impl FractalField {
    /// Build a field from counts in column-major order (every `y` of column 0, then column 1...).
    pub fn from_vec(width: usize, height: usize, max_iter: u32, counts: Vec<u32>) -> Self {
        Self {
            counts: nalgebra::DMatrix::from_vec(height, width, counts),
            max_iter,
        }
    }

    pub fn width(&self) -> usize {
        self.counts.ncols()
    }

    pub fn height(&self) -> usize {
        self.counts.nrows()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// The iteration bound the field was computed with.
    pub fn max_iter(&self) -> u32 {
        self.max_iter
    }

    /// The escape time at grid cell `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> Option<u32> {
        self.counts.get((y, x)).copied()
    }

    /// Whether the cell at `(x, y)` stayed bounded for every iteration.
    pub fn is_bounded(&self, x: usize, y: usize) -> Option<bool> {
        self.get(x, y).map(|n| n == self.max_iter)
    }

    /// Fetch a reference to the inner matrix.
    pub fn inner(&self) -> &nalgebra::DMatrix<u32> {
        &self.counts
    }

    /// Every count in column-major order.
    pub fn iter(&self) -> impl Iterator<Item = &u32> {
        self.counts.iter()
    }

    /// The share of cells that escaped before `max_iter`.
    pub fn escaped_fraction(&self) -> f64 {
        if self.is_empty() {
            return 0.;
        }
        let escaped = self.iter().filter(|&&n| n < self.max_iter).count();
        escaped as f64 / self.len() as f64
    }
}

/// Index by `(row, col)`, i.e. `(y, x)`.
impl std::ops::Index<(usize, usize)> for FractalField {
    type Output = u32;
    fn index(&self, pos: (usize, usize)) -> &Self::Output {
        &self.counts[pos]
    }
}

/// Every grid position in column-major order, matching `FractalField::from_vec`.
fn positions(viewport: &Viewport) -> Vec<Pos> {
    let bounds = viewport.bounds();
    (0..bounds.width)
        .cartesian_product(0..bounds.height)
        .map(Pos::from)
        .collect()
}

#[inline]
fn cell(viewport: &Viewport, mode: &Mode, formula: Formula, limits: &Limits, pos: Pos) -> u32 {
    let (z0, c) = mode.seed_and_constant(viewport.to_complex(pos));
    escape_time(formula, z0, c, limits)
}

/// Evaluate the escape time of every cell in the viewport.
///
/// # Performance
///
/// Cells are evaluated in parallel; this is the most expensive operation in the crate.
pub fn compute_field(
    viewport: &Viewport,
    mode: Mode,
    formula: Formula,
    limits: &Limits,
) -> FractalField {
    let bounds = viewport.bounds();

    let counts: Vec<u32> = positions(viewport)
        .par_iter()
        .map(|pos| cell(viewport, &mode, formula, limits, *pos))
        .collect();

    FractalField::from_vec(
        bounds.width as usize,
        bounds.height as usize,
        limits.max_iter,
        counts,
    )
}

/// `compute_field`, advancing `bar` once per evaluated cell.
pub fn compute_field_with_progress(
    viewport: &Viewport,
    mode: Mode,
    formula: Formula,
    limits: &Limits,
    bar: indicatif::ProgressBar,
) -> FractalField {
    let bounds = viewport.bounds();
    bar.set_length(bounds.cells() as u64);

    let counts: Vec<u32> = positions(viewport)
        .par_iter()
        .progress_with(bar)
        .map(|pos| cell(viewport, &mode, formula, limits, *pos))
        .collect();

    FractalField::from_vec(
        bounds.width as usize,
        bounds.height as usize,
        limits.max_iter,
        counts,
    )
}
