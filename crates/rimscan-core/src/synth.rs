//! Synthetic scans of the calibration cube, for tests.
//!
//! The cube sits on the XY plane centered at the origin with its faces
//! parallel to the axes. The top is flat. Walls are sampled finer
//! vertically than horizontally so that a rasterized rim has no gaps.
//! An optional "I" notch is a vertical slot cut into the wall at minimum Y,
//! open from the bottom up to `top_gap` below the rim.

use crate::Cloud;

#[derive(Clone, Copy, Debug)]
pub struct Notch {
    /// Slot width along X, centered on the face.
    pub width: f32,
    /// Wall left standing above the slot.
    pub top_gap: f32,
}

impl Default for Notch {
    fn default() -> Self { Self { width: 4.0, top_gap: 2.0 } }
}

#[derive(Clone, Copy, Debug)]
pub struct SynthCube {
    pub side: f32,
    pub height: f32,
    /// Horizontal sampling step on the top and along walls.
    pub step: f32,
    /// Vertical sampling step on walls.
    pub wall_step: f32,
    pub notch: Option<Notch>,
    /// Add a flat support ring at z = 0 around the footprint.
    pub platform: bool,
}

impl Default for SynthCube {
    fn default() -> Self {
        Self {
            side: 40.0,
            height: 40.0,
            step: 0.4,
            wall_step: 0.25,
            notch: Some(Notch::default()),
            platform: false,
        }
    }
}

impl SynthCube {
    pub fn build(&self) -> Cloud {
        let half = self.side / 2.0;
        let n = (self.side / self.step).round() as i32;
        let m = (self.height / self.wall_step).round() as i32;
        let along = |i: i32| -half + i as f32 * self.step;
        let mut c = Cloud::default();

        for i in 0..=n {
            for j in 0..=n {
                c.push(along(i), along(j), self.height);
            }
        }

        for i in 0..=n {
            let t = along(i);
            for k in 0..=m {
                let z = k as f32 * self.wall_step;
                let in_slot = self.notch.map_or(false, |s| {
                    t.abs() < s.width / 2.0 && z < self.height - s.top_gap
                });
                if !in_slot { c.push(t, -half, z); }
                c.push(t, half, z);
                c.push(-half, t, z);
                c.push(half, t, z);
            }
        }

        if self.platform {
            let outer = (half + 10.0) as i32;
            for i in -outer..=outer {
                for j in -outer..=outer {
                    let (x, y) = (i as f32, j as f32);
                    if x.abs() <= half && y.abs() <= half { continue; }
                    c.push(x, y, 0.0);
                }
            }
        }
        c
    }
}
