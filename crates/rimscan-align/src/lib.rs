//! rimscan-align: find the Z rotation that lines the cube's faces up with the axes.
//!
//! The score of an angle is how many points end up on the minimum-Y face
//! plane after rotating by it. A cube footprint repeats every 90°, so only
//! [0, 90) is searched, and the score is assumed to rise to a single peak and
//! fall after it.

use rimscan_core::{rotate_z, Axis, Cloud};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Which search `best_degree` runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Search { Bisection, Exhaustive }

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignCfg {
    pub search: Search,
    /// Points within this distance of the minimum Y count as "on the face".
    pub face_band: f32,
    /// Offset of the two probes taken either side of the midpoint.
    pub probe: f32,
    /// Step past the midpoint when the peak lies to its right.
    pub nudge: f32,
    /// Stop once the bracket is this narrow.
    pub tolerance: f32,
    pub max_iters: usize,
}

impl Default for AlignCfg {
    fn default() -> Self {
        Self { search: Search::Bisection, face_band: 1.0, probe: 2.0, nudge: 0.1, tolerance: 0.01, max_iters: 64 }
    }
}

/// Number of points lying within `band` of the cloud's minimum Y.
pub fn closest_points_count(points: &Cloud, band: f32) -> usize {
    let Some(min_y) = points.min(Axis::Y) else { return 0; };
    points.y.iter().filter(|&&y| (y - min_y).abs() <= band).count()
}

/// Evaluate `f` at every whole degree in [0, 90) and return the first best one.
pub fn exhaustive_peak<T: PartialOrd>(mut f: impl FnMut(f32) -> T) -> f32 {
    let mut best_degree = 0;
    let mut best = f(0.0);
    for d in 1..90 {
        let v = f(d as f32);
        if v > best { best = v; best_degree = d; }
    }
    best_degree as f32
}

/// Bisection for the peak of a unimodal `f` on [0, 90].
///
/// Each step probes `mid - probe`, `mid`, `mid + probe`. A midpoint above both
/// probes is the peak; a falling slope moves the right bound in; anything else
/// moves the left bound past the midpoint. Inputs that are not unimodal get no
/// guarantee beyond the `max_iters` bound.
pub fn bisect_peak<T: PartialOrd>(mut f: impl FnMut(f32) -> T, cfg: &AlignCfg) -> f32 {
    let (mut l, mut r) = (0.0_f32, 90.0_f32);
    let mut mid = 0.0;
    let mut iters = 0;

    while r - l > cfg.tolerance {
        if iters == cfg.max_iters {
            warn!(l, r, mid, iters, "bisection hit the iteration cap; objective may not be unimodal");
            break;
        }
        iters += 1;
        mid = (l + r) / 2.0;
        let n = f(mid);
        let rt = f(mid + cfg.probe);
        let lf = f(mid - cfg.probe);

        if n > rt && n > lf {
            debug!(mid, iters, "bisection found peak");
            return mid;
        } else if rt < n && n < lf {
            r = mid;
        } else {
            l = mid + cfg.nudge;
        }
    }
    debug!(mid, iters, "bisection bracket closed");
    mid
}

/// Reference search: best whole-degree rotation.
pub fn best_degree_exhaustive(points: &Cloud, cfg: &AlignCfg) -> f32 {
    exhaustive_peak(|d| closest_points_count(&rotate_z(points, d), cfg.face_band))
}

/// Production search: bisection over fractional degrees.
pub fn best_degree_bisect(points: &Cloud, cfg: &AlignCfg) -> f32 {
    bisect_peak(|d| closest_points_count(&rotate_z(points, d), cfg.face_band), cfg)
}

/// Rotation that squares `points` to the axes, using the configured search.
pub fn best_degree(points: &Cloud, cfg: &AlignCfg) -> f32 {
    match cfg.search {
        Search::Bisection => best_degree_bisect(points, cfg),
        Search::Exhaustive => best_degree_exhaustive(points, cfg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rimscan_core::synth::SynthCube;

    fn parabola(peak: f32) -> impl Fn(f32) -> f32 { move |d| -(d - peak).powi(2) }

    #[test]
    fn bisection_agrees_with_exhaustive_scan() {
        for peak in [17.3_f32, 45.0, 71.6, 8.2, 33.9] {
            let f = parabola(peak);
            let fast = bisect_peak(&f, &AlignCfg::default());
            let slow = exhaustive_peak(&f);
            assert!((fast - slow).abs() <= 1.0, "peak {peak}: bisect {fast} vs scan {slow}");
        }
    }

    #[test]
    fn bisection_agrees_on_a_skewed_tent() {
        // steeper on the right than on the left
        let f = |d: f32| if d < 58.0 { d } else { 58.0 - 3.0 * (d - 58.0) };
        let fast = bisect_peak(f, &AlignCfg::default());
        assert!((fast - exhaustive_peak(f)).abs() <= 1.0);
    }

    #[test]
    fn bisection_returns_midpoint_peak_immediately() {
        let mut calls = 0;
        let got = bisect_peak(|d| { calls += 1; -(d - 45.0).abs() }, &AlignCfg::default());
        assert_eq!(got, 45.0);
        assert_eq!(calls, 3);
    }

    #[test]
    fn bisection_is_bounded_on_flat_objective() {
        let mut calls = 0;
        let cfg = AlignCfg { max_iters: 10, ..Default::default() };
        let got = bisect_peak(|_| { calls += 1; 0 }, &cfg);
        assert!(calls <= 30);
        assert!((0.0..=90.0).contains(&got));
    }

    #[test]
    fn exhaustive_prefers_the_first_maximum() {
        assert_eq!(exhaustive_peak(|d| (d as i32 / 10).min(3)), 30.0);
        assert_eq!(exhaustive_peak(|_| 0), 0.0);
    }

    #[test]
    fn closest_points_count_band() {
        let c = Cloud::from_points(&[[0.0, -5.0, 0.0], [1.0, -4.0, 0.0], [2.0, -3.9, 0.0], [0.0, 8.0, 0.0]]);
        assert_eq!(closest_points_count(&c, 1.0), 2);
        assert_eq!(closest_points_count(&Cloud::default(), 1.0), 0);
    }

    #[test]
    fn aligns_a_rotated_cube() {
        let cube = SynthCube { notch: None, ..Default::default() }.build();
        let cfg = AlignCfg::default();

        // A cube turned by 60° is square to the axes again after another 30°.
        let raw = rotate_z(&cube, 60.0);
        let slow = best_degree_exhaustive(&raw, &cfg);
        let fast = best_degree_bisect(&raw, &cfg);
        assert_abs_diff_eq!(slow, 30.0, epsilon = 2.0);
        assert_abs_diff_eq!(fast, 30.0, epsilon = 2.0);

        let raw = rotate_z(&cube, 45.0);
        assert_eq!(best_degree(&raw, &cfg), 45.0);
        let cfg = AlignCfg { search: Search::Exhaustive, ..cfg };
        assert_eq!(best_degree(&raw, &cfg), 45.0);
    }
}
