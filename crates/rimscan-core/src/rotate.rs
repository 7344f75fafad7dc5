//! Rigid rotations of a whole cloud about the Z (vertical) and X axes.
//!
//! Both use the right-handed matrices
//! `Rz = [[c,-s,0],[s,c,0],[0,0,1]]` and `Rx = [[1,0,0],[0,c,-s],[0,s,c]]`.
//! Quarter turns use exact sine/cosine so that 0°, 90°, 180°, 270° and 360°
//! reproduce bit for bit.

use nalgebra::{Matrix3, Vector3};

use crate::Cloud;

/// Sine and cosine of an angle in degrees; exact for multiples of 90°.
fn sin_cos_deg(degrees: f64) -> (f64, f64) {
    let turned = degrees.rem_euclid(360.0);
    if turned % 90.0 == 0.0 {
        // rem_euclid can round up to exactly 360
        return match (turned / 90.0) as u32 % 4 {
            0 => (0.0, 1.0),
            1 => (1.0, 0.0),
            2 => (0.0, -1.0),
            _ => (-1.0, 0.0),
        };
    }
    degrees.to_radians().sin_cos()
}

fn transform(cloud: &Cloud, m: &Matrix3<f64>) -> Cloud {
    cloud.iter()
        .map(|[x, y, z]| {
            let p = m * Vector3::new(x as f64, y as f64, z as f64);
            [p.x as f32, p.y as f32, p.z as f32]
        })
        .collect()
}

/// Rotate every point about the Z axis by `degrees`.
pub fn rotate_z(cloud: &Cloud, degrees: f32) -> Cloud {
    let (s, c) = sin_cos_deg(degrees as f64);
    let m = Matrix3::new(
        c,  -s,  0.0,
        s,   c,  0.0,
        0.0, 0.0, 1.0,
    );
    transform(cloud, &m)
}

/// Rotate every point about the X axis by `degrees`.
pub fn rotate_x(cloud: &Cloud, degrees: f32) -> Cloud {
    let (s, c) = sin_cos_deg(degrees as f64);
    let m = Matrix3::new(
        1.0, 0.0, 0.0,
        0.0, c,   -s,
        0.0, s,    c,
    );
    transform(cloud, &m)
}
