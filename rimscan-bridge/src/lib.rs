//! rimscan-bridge: the whole cube inspection as one call, plus a batch fan-out.
//!
//! raw scan → clean → align → identify face Y → turn target face forward
//! → sample the top skin → heatmap.

use anyhow::{Context, Result};
use rayon::prelude::*;
use rimscan_align::best_degree;
use rimscan_core::{rotate_x, rotate_z, Cloud};
use rimscan_face::{degrees_to_face_y, face_forward_degrees, upper_cube, Orientation};
use rimscan_features::{heatmap, Heatmap};
use rimscan_filters::{clean, sample_target_surface};
use serde::Serialize;
use tracing::{debug, info, warn};

mod config;

pub use config::PipelineConfig;

/// Cube squared to the axes with the target face forward, and its top skin.
#[derive(Clone, Debug, Serialize)]
pub struct Oriented {
    /// Rotation found by the aligner, in [0, 90).
    pub aligned_degrees: f32,
    pub face_y: Orientation,
    pub cube: Cloud,
    pub surface: Cloud,
}

#[derive(Clone, Debug, Serialize)]
pub struct CubeReport {
    pub aligned_degrees: f32,
    pub face_y: Orientation,
    pub cube: Cloud,
    pub surface: Cloud,
    pub heatmap: Heatmap,
}

/// Clean, align and orient a raw scan, then sample its target surface.
pub fn orient_and_sample(raw: &Cloud, cfg: &PipelineConfig) -> Result<Oriented> {
    let cleaned = clean(raw, &cfg.clean);
    if cleaned.is_empty() && !raw.is_empty() {
        warn!(raw = raw.len(), "cleaning removed every point");
    }

    let aligned_degrees = best_degree(&cleaned, &cfg.align);
    let aligned = rotate_z(&cleaned, aligned_degrees);
    debug!(aligned_degrees, points = aligned.len(), "cube aligned");

    let upper = upper_cube(&aligned, &cfg.face);
    let face_y = degrees_to_face_y(&upper, &cfg.face).context("identifying face Y")?;

    let cube = rotate_z(&aligned, face_forward_degrees(face_y, &cfg.face));
    let surface = sample_target_surface(&cube, cfg.sample.height);
    Ok(Oriented { aligned_degrees, face_y, cube, surface })
}

/// Full inspection of one scan.
pub fn inspect(raw: &Cloud, cfg: &PipelineConfig) -> Result<CubeReport> {
    let Oriented { aligned_degrees, face_y, cube, surface } = orient_and_sample(raw, cfg)?;
    let heatmap = heatmap(&surface, &cfg.heatmap).context("computing surface heatmap")?;
    info!(
        points = raw.len(),
        aligned_degrees,
        face_y = face_y.degrees(),
        surface = surface.len(),
        "cube inspected"
    );
    Ok(CubeReport { aligned_degrees, face_y, cube, surface, heatmap })
}

/// Inspect many named scans in parallel. Results keep the input order and one
/// failing cube does not affect the others.
pub fn process_batch(cubes: &[(String, Cloud)], cfg: &PipelineConfig) -> Vec<(String, Result<CubeReport>)> {
    cubes
        .par_iter()
        .map(|(name, raw)| {
            let report = inspect(raw, cfg).with_context(|| format!("cube {name}"));
            if let Err(e) = &report {
                warn!(cube = %name, error = ?e, "cube failed");
            }
            (name.clone(), report)
        })
        .collect()
}

/// Surface laid flat for 2D export: turned −90° about X, then read as (x, z).
pub fn surface_projection(surface: &Cloud) -> Vec<[f32; 2]> {
    let turned = rotate_x(surface, -90.0);
    turned.iter().map(|[x, _, z]| [x, z]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rimscan_core::RimError;

    #[test]
    fn projection_lays_the_surface_flat() {
        let s = Cloud::from_points(&[[1.0, 2.0, 3.0], [-4.0, 0.5, 10.0]]);
        assert_eq!(surface_projection(&s), vec![[1.0, -2.0], [-4.0, -0.5]]);
        assert!(surface_projection(&Cloud::default()).is_empty());
    }

    #[test]
    fn empty_scan_fails_at_face_identification() {
        let err = inspect(&Cloud::default(), &PipelineConfig::default()).unwrap_err();
        assert!(format!("{err:#}").contains("identifying face Y"));
        assert!(matches!(err.downcast_ref::<RimError>(), Some(RimError::EmptyCloud { .. })));
    }
}
