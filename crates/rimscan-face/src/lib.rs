//! rimscan-face: tell the cube's four vertical faces apart by their rim.
//!
//! The face named "Y" has an empty "I" slot under its top edge; the face named
//! "X" (the inspection target) has a "V" and sits a quarter turn away. With the
//! cube already square to the axes, each of the four quarter turns is tried in
//! order: the face nearest the viewer (minimum Y) is projected onto XZ,
//! rasterized, and checked for a column that is empty from the bottom up for
//! at least `min_pattern_len` cells.

use rimscan_core::{rotate_z, Axis, Cloud, Result, RimError};
use rimscan_filters::height_band;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub mod grid;

pub use grid::{face_to_grid, OccupancyGrid};

/// Candidate quarter turns about Z, in search order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation { Deg0, Deg90, Deg180, Deg270 }

impl Orientation {
    pub const ALL: [Orientation; 4] = [Self::Deg0, Self::Deg90, Self::Deg180, Self::Deg270];

    pub fn degrees(self) -> f32 {
        match self { Self::Deg0 => 0.0, Self::Deg90 => 90.0, Self::Deg180 => 180.0, Self::Deg270 => 270.0 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaceCfg {
    pub rows: usize,
    pub cols: usize,
    /// Cells a bottom-up empty run needs to count as the "I" slot.
    pub min_pattern_len: usize,
    /// Height of the rim slice kept below the top.
    pub upper_tolerance: f32,
    /// Points closer than this to the minimum Y form the nearest face.
    pub face_depth: f32,
    /// Turn from face Y to the target face.
    pub face_offset_deg: f32,
}

impl Default for FaceCfg {
    fn default() -> Self {
        Self { rows: 30, cols: 30, min_pattern_len: 10, upper_tolerance: 10.0, face_depth: 3.0, face_offset_deg: -90.0 }
    }
}

/// Rim slice: points within `upper_tolerance` of the cube's top.
pub fn upper_cube(cube: &Cloud, cfg: &FaceCfg) -> Cloud {
    height_band(cube, cfg.upper_tolerance)
}

/// The face nearest the viewer, flattened to (x, z).
pub fn closest_face(points: &Cloud, depth: f32) -> Vec<[f32; 2]> {
    let Some(min_y) = points.min(Axis::Y) else { return Vec::new(); };
    points.iter()
        .filter(|p| (p[1] - min_y).abs() < depth)
        .map(|p| [p[0], p[2]])
        .collect()
}

/// Raster of the nearest face after turning the rim slice by `o`.
pub fn orientation_grid(upper: &Cloud, o: Orientation, cfg: &FaceCfg) -> Result<OccupancyGrid> {
    let turned = rotate_z(upper, o.degrees());
    face_to_grid(&closest_face(&turned, cfg.face_depth), cfg.rows, cfg.cols)
}

/// All four candidate rasters, for display.
pub fn orientation_grids(upper: &Cloud, cfg: &FaceCfg) -> Result<Vec<(Orientation, OccupancyGrid)>> {
    Orientation::ALL.iter()
        .map(|&o| Ok((o, orientation_grid(upper, o, cfg)?)))
        .collect()
}

/// Quarter turn that brings face Y to the viewer.
///
/// The first orientation whose raster shows the slot wins. If none does the
/// cube cannot be oriented and `PatternNotFound` is returned.
pub fn degrees_to_face_y(upper: &Cloud, cfg: &FaceCfg) -> Result<Orientation> {
    if upper.is_empty() {
        return Err(RimError::EmptyCloud { stage: "face identification" });
    }
    for o in Orientation::ALL {
        let grid = orientation_grid(upper, o, cfg)?;
        let run = grid.longest_bottom_run();
        debug!(orientation = o.degrees(), run, occupied = grid.occupied(), "rim raster");
        if run >= cfg.min_pattern_len {
            return Ok(o);
        }
    }
    Err(RimError::PatternNotFound { tried: Orientation::ALL.len() })
}

/// Z rotation that brings the target face forward: face Y's turn plus the fixed offset.
pub fn face_forward_degrees(face_y: Orientation, cfg: &FaceCfg) -> f32 {
    face_y.degrees() + cfg.face_offset_deg
}

#[cfg(test)]
mod tests {
    use super::*;
    use rimscan_core::synth::SynthCube;

    fn notched_upper(quarter_turns: u32) -> Cloud {
        let cube = SynthCube::default().build();
        let placed = rotate_z(&cube, 90.0 * quarter_turns as f32);
        upper_cube(&placed, &FaceCfg::default())
    }

    #[test]
    fn finds_the_notch_in_every_placement() {
        // notch starts at minimum Y; a +90° turn carries it to +X, which
        // needs 270° to come back
        let expected = [Orientation::Deg0, Orientation::Deg270, Orientation::Deg180, Orientation::Deg90];
        for (q, want) in expected.into_iter().enumerate() {
            let upper = notched_upper(q as u32);
            assert_eq!(degrees_to_face_y(&upper, &FaceCfg::default()).unwrap(), want, "placement {q}");
        }
    }

    #[test]
    fn target_face_is_a_quarter_turn_back() {
        let cfg = FaceCfg::default();
        let face_y = degrees_to_face_y(&notched_upper(2), &cfg).unwrap();
        assert_eq!(face_forward_degrees(face_y, &cfg), 90.0);
        let face_y = degrees_to_face_y(&notched_upper(0), &cfg).unwrap();
        assert_eq!(face_forward_degrees(face_y, &cfg), -90.0);
        let cfg = FaceCfg { face_offset_deg: 0.0, ..cfg };
        assert_eq!(face_forward_degrees(Orientation::Deg270, &cfg), 270.0);
    }

    #[test]
    fn plain_cube_has_no_pattern() {
        let cube = SynthCube { notch: None, ..Default::default() }.build();
        let upper = upper_cube(&cube, &FaceCfg::default());
        let err = degrees_to_face_y(&upper, &FaceCfg::default()).unwrap_err();
        assert!(matches!(err, RimError::PatternNotFound { tried: 4 }));
    }

    #[test]
    fn empty_rim_is_a_precondition_error() {
        let err = degrees_to_face_y(&Cloud::default(), &FaceCfg::default()).unwrap_err();
        assert!(matches!(err, RimError::EmptyCloud { .. }));
    }

    #[test]
    fn only_the_notched_raster_has_a_long_run() {
        let upper = notched_upper(0);
        let grids = orientation_grids(&upper, &FaceCfg::default()).unwrap();
        assert_eq!(grids.len(), 4);
        let runs: Vec<usize> = grids.iter().map(|(_, g)| g.longest_bottom_run()).collect();
        assert!(runs[0] >= 10, "runs {runs:?}");
        assert!(runs[1..].iter().all(|&r| r < 10), "runs {runs:?}");
    }

    #[test]
    fn closest_face_projects_to_xz() {
        let c = Cloud::from_points(&[[1.0, -10.0, 5.0], [2.0, -8.5, 6.0], [3.0, -7.0, 7.0]]);
        assert_eq!(closest_face(&c, 3.0), vec![[1.0, 5.0], [2.0, 6.0]]);
        assert!(closest_face(&Cloud::default(), 3.0).is_empty());
    }

    #[test]
    fn upper_cube_keeps_the_top_ten() {
        let c = Cloud::from_points(&[[0.0, 0.0, 40.0], [0.0, 0.0, 30.0], [0.0, 0.0, 29.5]]);
        assert_eq!(upper_cube(&c, &FaceCfg::default()).z, vec![40.0, 30.0]);
    }
}
