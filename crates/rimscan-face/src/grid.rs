//! Binary raster of a projected face.

use rimscan_core::{Result, RimError};
use serde::{Deserialize, Serialize};

/// `rows × cols` occupancy raster, row-major. Row 0 is the top of the face
/// (largest vertical coordinate), the last row is the bottom.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyGrid {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
}

impl OccupancyGrid {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols, cells: vec![false; rows * cols] }
    }

    pub fn rows(&self) -> usize { self.rows }
    pub fn cols(&self) -> usize { self.cols }

    #[inline]
    pub fn is_occupied(&self, row: usize, col: usize) -> bool { self.cells[row * self.cols + col] }

    pub fn occupied(&self) -> usize { self.cells.iter().filter(|&&c| c).count() }

    /// Length of the run of empty cells that starts at the bottom of `col`.
    /// Zero when the bottom cell is occupied.
    pub fn bottom_empty_run(&self, col: usize) -> usize {
        (0..self.rows).rev().take_while(|&r| !self.is_occupied(r, col)).count()
    }

    /// Longest bottom empty run over all columns.
    pub fn longest_bottom_run(&self) -> usize {
        (0..self.cols).map(|c| self.bottom_empty_run(c)).max().unwrap_or(0)
    }

    /// Rows as strings of `#` and `.`, top row first.
    pub fn to_ascii(&self) -> String {
        let mut s = String::with_capacity(self.rows * (self.cols + 1));
        for r in 0..self.rows {
            for c in 0..self.cols { s.push(if self.is_occupied(r, c) { '#' } else { '.' }); }
            s.push('\n');
        }
        s
    }
}

/// Bin index of `v` in `n` bins of `width` starting at `min`.
/// The far edge lands in the last bin; a zero-width span puts everything in bin 0.
fn bin(v: f64, min: f64, width: f64, n: usize) -> i64 {
    if width == 0.0 { return 0; }
    let q = ((v - min) / width).floor();
    if !q.is_finite() { return -1; }
    let i = q as i64;
    if i == n as i64 { i - 1 } else { i }
}

/// Rasterize `(u, v)` points (horizontal, vertical) over their own extents.
///
/// Every in-range point marks exactly one cell. A computed index outside the
/// grid is reported as an error before anything is written.
pub fn face_to_grid(points: &[[f32; 2]], rows: usize, cols: usize) -> Result<OccupancyGrid> {
    if rows == 0 || cols == 0 {
        return Err(RimError::InvalidParameter { reason: format!("grid must be non-empty, got {rows}x{cols}") });
    }
    if points.is_empty() {
        return Err(RimError::EmptyCloud { stage: "face rasterization" });
    }

    let (mut min_u, mut max_u) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_v, mut max_v) = (f64::INFINITY, f64::NEG_INFINITY);
    for &[u, v] in points {
        min_u = min_u.min(u as f64); max_u = max_u.max(u as f64);
        min_v = min_v.min(v as f64); max_v = max_v.max(v as f64);
    }
    let u_width = (max_u - min_u) / cols as f64;
    let v_width = (max_v - min_v) / rows as f64;

    let mut grid = OccupancyGrid::new(rows, cols);
    for &[u, v] in points {
        let c = bin(u as f64, min_u, u_width, cols);
        let r = bin(v as f64, min_v, v_width, rows);
        if c < 0 || r < 0 || c >= cols as i64 || r >= rows as i64 {
            return Err(RimError::GridIndexOutOfRange { u, v, row: r, col: c, rows, cols });
        }
        // bottom of the face goes in the last row
        let row = rows - 1 - r as usize;
        grid.cells[row * cols + c as usize] = true;
    }
    Ok(grid)
}
