use approx::assert_abs_diff_eq;
use rimscan_bridge::{inspect, orient_and_sample, process_batch, surface_projection, PipelineConfig};
use rimscan_core::synth::SynthCube;
use rimscan_core::{rotate_z, Axis, Cloud, RimError};
use rimscan_face::Orientation;
use rimscan_features::{HeatmapCfg, HeatmapScale};

fn small_cfg() -> PipelineConfig {
    PipelineConfig {
        heatmap: HeatmapCfg { resolution: 42, ..Default::default() },
        ..Default::default()
    }
}

/// Notched cube on a support platform, turned 45° on the scanner bed.
fn scanned_cube() -> Cloud {
    let cube = SynthCube { platform: true, ..Default::default() }.build();
    rotate_z(&cube, 45.0)
}

#[test]
fn notched_cube_end_to_end() {
    let report = inspect(&scanned_cube(), &small_cfg()).expect("pipeline should succeed");
    let cfg = small_cfg();
    // the saved cube is the aligned one turned by face Y's angle plus the offset
    assert_eq!(rimscan_face::face_forward_degrees(report.face_y, &cfg.face), 180.0);

    assert_eq!(report.aligned_degrees, 45.0);
    // after alignment the slot faces +X
    assert_eq!(report.face_y, Orientation::Deg270);

    // the platform is gone and the cube stands on its own footprint
    let top = report.cube.max(Axis::Z).unwrap();
    assert!(report.cube.min(Axis::Z).unwrap() > top - 10.0);
    assert!(report.surface.iter().all(|p| top - p[2] <= 0.5));

    let h = &report.heatmap;
    assert_eq!((h.rows, h.cols), (40, 40));
    assert_abs_diff_eq!(h.plane.normal[2], 1.0, epsilon = 1e-3);
    for &v in &h.values {
        assert_abs_diff_eq!(v, 0.0, epsilon = 1e-3);
    }
}

#[test]
fn byte_scaled_heatmap_of_a_flat_top_is_black() {
    let cfg = PipelineConfig {
        heatmap: HeatmapCfg { resolution: 42, scale: HeatmapScale::Bytes { span: 0.5 }, ..Default::default() },
        ..Default::default()
    };
    let report = inspect(&scanned_cube(), &cfg).unwrap();
    assert!(report.heatmap.values.iter().all(|&v| v == 0.0));
}

#[test]
fn surface_projects_to_the_xz_plane() {
    let oriented = orient_and_sample(&scanned_cube(), &small_cfg()).unwrap();
    let flat = surface_projection(&oriented.surface);
    assert_eq!(flat.len(), oriented.surface.len());
    for (p, q) in oriented.surface.iter().zip(&flat) {
        assert_eq!(q[0], p[0]);
        assert_eq!(q[1], -p[1]);
    }
}

#[test]
fn cube_without_a_notch_cannot_be_oriented() {
    let plain = rotate_z(&SynthCube { notch: None, ..Default::default() }.build(), 30.0);
    let err = inspect(&plain, &small_cfg()).unwrap_err();
    assert!(matches!(err.downcast_ref::<RimError>(), Some(RimError::PatternNotFound { tried: 4 })));
}

#[test]
fn batch_reports_each_cube_separately() {
    let plain = SynthCube { notch: None, ..Default::default() }.build();
    let cubes = vec![
        ("good".to_string(), scanned_cube()),
        ("plain".to_string(), plain),
        ("empty".to_string(), Cloud::default()),
    ];
    let results = process_batch(&cubes, &small_cfg());

    let names: Vec<&str> = results.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, ["good", "plain", "empty"]);

    assert_eq!(results[0].1.as_ref().unwrap().face_y, Orientation::Deg270);

    let err = results[1].1.as_ref().unwrap_err();
    assert!(format!("{err:#}").contains("cube plain"));
    assert!(matches!(err.downcast_ref::<RimError>(), Some(RimError::PatternNotFound { .. })));

    let err = results[2].1.as_ref().unwrap_err();
    assert!(matches!(err.downcast_ref::<RimError>(), Some(RimError::EmptyCloud { .. })));
}
