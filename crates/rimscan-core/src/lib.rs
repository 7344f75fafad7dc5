//! rimscan-core: point cloud data model, rotations and the shared error type.

use serde::{Deserialize, Serialize};

pub mod error;
pub mod rotate;
#[cfg(feature = "synth")]
pub mod synth;

pub use error::{Result, RimError};
pub use rotate::{rotate_x, rotate_z};

/// Coordinate axis of a point.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis { X, Y, Z }

impl Axis {
    pub fn index(self) -> usize { self as usize }
}

/// Structure-of-Arrays point cloud.
/// Columns always have the same length; filters keep point order.
#[derive(Default, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cloud {
    pub x: Vec<f32>,
    pub y: Vec<f32>,
    pub z: Vec<f32>,
}

impl Cloud {
    pub fn with_capacity(n: usize) -> Self {
        Self { x: Vec::with_capacity(n), y: Vec::with_capacity(n), z: Vec::with_capacity(n) }
    }
    pub fn from_points(pts: &[[f32; 3]]) -> Self { pts.iter().copied().collect() }

    pub fn len(&self) -> usize { self.x.len() }
    pub fn is_empty(&self) -> bool { self.x.is_empty() }
    pub fn push(&mut self, px: f32, py: f32, pz: f32) {
        self.x.push(px); self.y.push(py); self.z.push(pz);
    }

    #[inline]
    pub fn point(&self, i: usize) -> [f32; 3] { [self.x[i], self.y[i], self.z[i]] }

    pub fn iter(&self) -> impl Iterator<Item = [f32; 3]> + '_ {
        (0..self.len()).map(move |i| self.point(i))
    }

    pub fn to_points(&self) -> Vec<[f32; 3]> { self.iter().collect() }

    pub fn column(&self, axis: Axis) -> &[f32] {
        match axis { Axis::X => &self.x, Axis::Y => &self.y, Axis::Z => &self.z }
    }

    /// Smallest coordinate along `axis`, `None` for an empty cloud.
    pub fn min(&self, axis: Axis) -> Option<f32> {
        let col = self.column(axis);
        if col.is_empty() { return None; }
        Some(col.iter().copied().fold(f32::INFINITY, f32::min))
    }

    /// Largest coordinate along `axis`, `None` for an empty cloud.
    pub fn max(&self, axis: Axis) -> Option<f32> {
        let col = self.column(axis);
        if col.is_empty() { return None; }
        Some(col.iter().copied().fold(f32::NEG_INFINITY, f32::max))
    }

    pub fn bounds(&self) -> Option<Aabb> {
        if self.is_empty() { return None; }
        let mut b = Aabb { min: [f32::INFINITY; 3], max: [f32::NEG_INFINITY; 3] };
        for p in self.iter() {
            for a in 0..3 {
                b.min[a] = b.min[a].min(p[a]);
                b.max[a] = b.max[a].max(p[a]);
            }
        }
        Some(b)
    }

    /// New cloud holding the points that satisfy `keep`, in their original order.
    pub fn select(&self, mut keep: impl FnMut([f32; 3]) -> bool) -> Cloud {
        let mut out = Cloud::default();
        for p in self.iter() {
            if keep(p) { out.push(p[0], p[1], p[2]); }
        }
        out
    }
}

impl FromIterator<[f32; 3]> for Cloud {
    fn from_iter<I: IntoIterator<Item = [f32; 3]>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut c = Cloud::with_capacity(iter.size_hint().0);
        for p in iter { c.push(p[0], p[1], p[2]); }
        c
    }
}

/// Zero-copy view into a Cloud (slice-of-SoA).
#[derive(Copy, Clone)]
pub struct CloudView<'a> {
    pub x: &'a [f32],
    pub y: &'a [f32],
    pub z: &'a [f32],
}

impl<'a> CloudView<'a> {
    pub fn len(&self) -> usize { self.x.len() }
    pub fn is_empty(&self) -> bool { self.x.is_empty() }
    #[inline]
    pub fn point(&self, i: usize) -> [f32; 3] { [self.x[i], self.y[i], self.z[i]] }
    #[inline]
    pub fn coord(&self, i: usize, axis: usize) -> f32 {
        match axis { 0 => self.x[i], 1 => self.y[i], _ => self.z[i] }
    }
}

impl<'a> From<&'a Cloud> for CloudView<'a> {
    fn from(c: &'a Cloud) -> Self { Self { x: &c.x, y: &c.y, z: &c.z } }
}

/// Simple AABB
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb { pub min: [f32; 3], pub max: [f32; 3] }

impl Aabb {
    pub fn contains(&self, p: [f32; 3]) -> bool {
        (0..3).all(|i| p[i] >= self.min[i] && p[i] <= self.max[i])
    }
    pub fn extent(&self, axis: Axis) -> f32 { self.max[axis.index()] - self.min[axis.index()] }
    /// Midpoint of the extents along `axis`.
    pub fn center(&self, axis: Axis) -> f32 { (self.min[axis.index()] + self.max[axis.index()]) / 2.0 }
}
