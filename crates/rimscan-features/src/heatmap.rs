//! Height-deviation heatmap of a sampled surface against its best-fit plane.

use rayon::prelude::*;
use rimscan_core::{Axis, Cloud, Result, RimError};
use rimscan_filters::above_z;
use rimscan_nn::{KdTree, NeighborIndex3};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::plane::{fit_plane, Plane};

/// How raw deviations are normalized once the minimum is subtracted.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HeatmapScale {
    /// Deviation above the lowest cell, in model units.
    Offset,
    /// `floor(offset / span * 255)`: a gray level when deviations stay within `span`.
    Bytes { span: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatmapCfg {
    /// Samples per side of the query grid, before trimming.
    pub resolution: usize,
    /// Side of the square window, in model units.
    pub window: f32,
    /// Neighbors averaged per query.
    pub k: usize,
    pub x_adjust: f32,
    pub y_adjust: f32,
    /// Drop points at or below this height before fitting.
    pub z_threshold: Option<f32>,
    /// Cells trimmed from every side.
    pub border: usize,
    pub scale: HeatmapScale,
}

impl Default for HeatmapCfg {
    fn default() -> Self {
        Self {
            resolution: 514,
            window: 30.0,
            k: 3,
            x_adjust: 0.0,
            y_adjust: 0.0,
            z_threshold: None,
            border: 1,
            scale: HeatmapScale::Offset,
        }
    }
}

impl HeatmapCfg {
    fn validate(&self) -> Result<()> {
        let bad = |reason: String| Err(RimError::InvalidParameter { reason });
        if self.k == 0 { return bad("k must be greater than 0".into()); }
        if self.resolution <= 2 * self.border {
            return bad(format!("resolution {} leaves nothing after a border of {}", self.resolution, self.border));
        }
        if !(self.window > 0.0) { return bad(format!("window must be positive, got {}", self.window)); }
        if let HeatmapScale::Bytes { span } = self.scale {
            if !(span > 0.0) { return bad(format!("byte span must be positive, got {span}")); }
        }
        Ok(())
    }
}

/// Row-major grid of deviations; rows follow Y, columns follow X.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Heatmap {
    pub rows: usize,
    pub cols: usize,
    pub values: Vec<f32>,
    pub plane: Plane,
}

impl Heatmap {
    pub fn get(&self, row: usize, col: usize) -> f32 { self.values[row * self.cols + col] }
    pub fn row(&self, row: usize) -> &[f32] { &self.values[row * self.cols..(row + 1) * self.cols] }
    pub fn min(&self) -> f32 { self.values.iter().copied().fold(f32::INFINITY, f32::min) }
    pub fn max(&self) -> f32 { self.values.iter().copied().fold(f32::NEG_INFINITY, f32::max) }
}

/// `n` evenly spaced samples from `start` to `end` inclusive.
fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    if n == 1 { return vec![start]; }
    let step = (end - start) / (n - 1) as f64;
    (0..n).map(|i| start + step * i as f64).collect()
}

/// Average signed distance, along the plane normal, from `q` to its `k` nearest points.
fn deviation(tree: &KdTree, pts: &Cloud, plane: &Plane, q: [f64; 3], k: usize) -> f64 {
    let neigh = tree.knn([q[0] as f32, q[1] as f32, q[2] as f32], k);
    if neigh.is_empty() { return 0.0; }
    let [a, b, c] = plane.normal;
    let sum: f64 = neigh.iter().map(|n| {
        let p = pts.point(n.idx);
        a * (p[0] as f64 - q[0]) + b * (p[1] as f64 - q[1]) + c * (p[2] as f64 - q[2])
    }).sum();
    sum / neigh.len() as f64
}

/// Build the heatmap of `points` (the sampled target surface).
///
/// A plane is fitted to the points, a square grid of query positions is laid on
/// it around the middle of the X/Y extents, and every query records how far its
/// nearest points sit above or below the plane. Queries run in parallel.
pub fn heatmap(points: &Cloud, cfg: &HeatmapCfg) -> Result<Heatmap> {
    cfg.validate()?;
    let filtered;
    let pts = match cfg.z_threshold {
        Some(t) => { filtered = above_z(points, t); &filtered }
        None => points,
    };

    let plane = fit_plane(pts)?;
    if plane.normal[2].abs() < 1e-6 {
        return Err(RimError::DegeneratePlane { normal_z: plane.normal[2] });
    }
    let [a, b, c] = plane.normal;
    debug!(a, b, c, d = plane.d, points = pts.len(), "fitted plane");

    let bounds = pts.bounds().ok_or(RimError::EmptyCloud { stage: "heatmap" })?;
    let x_mid = (bounds.center(Axis::X) + cfg.x_adjust) as f64;
    let y_mid = (bounds.center(Axis::Y) + cfg.y_adjust) as f64;
    let half = cfg.window as f64 / 2.0;
    let n = cfg.resolution;
    let xs = linspace(x_mid - half, x_mid + half, n);
    let ys = linspace(y_mid - half, y_mid + half, n);

    let tree = KdTree::build(pts.into());
    let raw: Vec<f64> = (0..n * n)
        .into_par_iter()
        .map(|i| {
            let (x, y) = (xs[i % n], ys[i / n]);
            deviation(&tree, pts, &plane, [x, y, plane.z_at(x, y)], cfg.k)
        })
        .collect();

    let lo = raw.iter().copied().fold(f64::INFINITY, f64::min);
    let normalize = |v: f64| -> f32 {
        let off = v - lo;
        match cfg.scale {
            HeatmapScale::Offset => off as f32,
            HeatmapScale::Bytes { span } => (off / span as f64 * 255.0).floor() as f32,
        }
    };

    let (from, to) = (cfg.border, n - cfg.border);
    let side = to - from;
    let mut values = Vec::with_capacity(side * side);
    for r in from..to {
        values.extend(raw[r * n + from..r * n + to].iter().map(|&v| normalize(v)));
    }
    debug!(resolution = n, side, min = lo, "heatmap computed");
    Ok(Heatmap { rows: side, cols: side, values, plane })
}
