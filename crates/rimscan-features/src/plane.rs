//! Least-squares plane through a cloud (PCA).

use nalgebra::{Matrix3, Vector3};
use rimscan_core::{Cloud, Result, RimError};
use serde::{Deserialize, Serialize};

/// `a·x + b·y + c·z + d = 0` with unit normal `[a, b, c]`, `c >= 0`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub normal: [f64; 3],
    pub d: f64,
    pub centroid: [f64; 3],
}

impl Plane {
    /// Signed distance of `p` along the normal.
    pub fn signed_distance(&self, p: [f64; 3]) -> f64 {
        let [a, b, c] = self.normal;
        a * p[0] + b * p[1] + c * p[2] + self.d
    }

    /// Height of the plane above (x, y). Only meaningful for non-vertical planes.
    pub fn z_at(&self, x: f64, y: f64) -> f64 {
        let [a, b, c] = self.normal;
        (-a * x - b * y - self.d) / c
    }
}

/// Fit a plane through the centroid; the normal is the direction of least variance.
pub fn fit_plane(points: &Cloud) -> Result<Plane> {
    if points.len() < 3 {
        return Err(RimError::InsufficientPoints { stage: "plane fitting", required: 3, actual: points.len() });
    }

    // mean
    let mut mean = Vector3::<f64>::zeros();
    for [x, y, z] in points.iter() {
        mean += Vector3::new(x as f64, y as f64, z as f64);
    }
    mean /= points.len() as f64;

    // covariance
    let mut cov = Matrix3::<f64>::zeros();
    for [x, y, z] in points.iter() {
        let v = Vector3::new(x as f64, y as f64, z as f64) - mean;
        cov += v * v.transpose();
    }
    cov /= points.len() as f64;

    // smallest eigenvector ~ normal
    let eig = cov.symmetric_eigen();
    let (mut min_i, mut min_val) = (0, eig.eigenvalues[0]);
    for k in 1..3 {
        if eig.eigenvalues[k] < min_val { min_i = k; min_val = eig.eigenvalues[k]; }
    }
    let mut n: Vector3<f64> = eig.eigenvectors.column(min_i).into_owned();
    n /= n.norm();
    if n.z < 0.0 { n = -n; }

    Ok(Plane { normal: [n.x, n.y, n.z], d: -n.dot(&mean), centroid: [mean.x, mean.y, mean.z] })
}
