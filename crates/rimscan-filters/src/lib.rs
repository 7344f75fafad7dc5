//! rimscan-filters: cube cleaning and height-band selections.

use hashbrown::HashMap;
use rimscan_core::{Axis, Cloud};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanCfg {
    /// Max drop below the column top, and of the column top below the global top.
    pub height_tolerance: f32,
    /// Decimal places x/y are rounded to when forming a column key.
    pub key_decimals: u32,
}

impl Default for CleanCfg {
    fn default() -> Self { Self { height_tolerance: 10.0, key_decimals: 2 } }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleCfg {
    /// Thickness of the skin kept below the top.
    pub height: f32,
}

impl Default for SampleCfg {
    fn default() -> Self { Self { height: 0.5 } }
}

/// Column key: (x, y) rounded to `decimals` places, as scaled integers.
#[inline]
fn column_key(x: f32, y: f32, scale: f64) -> (i64, i64) {
    ((x as f64 * scale).round() as i64, (y as f64 * scale).round() as i64)
}

/// Highest z seen in every (x, y) column.
fn max_height_by_column(input: &Cloud, scale: f64) -> HashMap<(i64, i64), f32> {
    let mut table: HashMap<(i64, i64), f32> = HashMap::with_capacity(input.len());
    for [x, y, z] in input.iter() {
        table.entry(column_key(x, y, scale))
            .and_modify(|m| *m = m.max(z))
            .or_insert(z);
    }
    table
}

/// Keep the points that belong to the top region of the cube.
///
/// A point survives when it is within `height_tolerance` of the highest point
/// in its (x, y) column and that column top is within `height_tolerance` of
/// the global top. This is a heuristic: it can drop genuine cube points and
/// keep stray points that sit under a high column.
pub fn clean(input: &Cloud, cfg: &CleanCfg) -> Cloud {
    let Some(max_z) = input.max(Axis::Z) else { return Cloud::default(); };
    let scale = 10f64.powi(cfg.key_decimals as i32);
    let table = max_height_by_column(input, scale);
    let tol = cfg.height_tolerance;

    let out = input.select(|[x, y, z]| {
        let top = table[&column_key(x, y, scale)];
        top - z < tol && max_z - top < tol
    });
    debug!(input = input.len(), columns = table.len(), kept = out.len(), "cleaned cube");
    out
}

/// Points no more than `tolerance` below the highest point.
pub fn height_band(input: &Cloud, tolerance: f32) -> Cloud {
    let Some(max_z) = input.max(Axis::Z) else { return Cloud::default(); };
    input.select(|p| max_z - p[2] <= tolerance)
}

/// Thin top skin of the oriented cube: points within `h` of the max Z.
pub fn sample_target_surface(cube: &Cloud, h: f32) -> Cloud {
    let out = height_band(cube, h);
    debug!(cube = cube.len(), surface = out.len(), h, "sampled target surface");
    out
}

/// Points strictly above `z_threshold`.
pub fn above_z(input: &Cloud, z_threshold: f32) -> Cloud {
    input.select(|p| p[2] > z_threshold)
}
