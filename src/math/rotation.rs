use super::Vec3;
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

/// Euler angles in radians.
///
/// The canonical axes are `x = pitch`, `y = yaw` and `z = roll`. The rotation
/// formulas below are written against those accessors, so the mapping must not
/// change.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Rotation {
    pub roll: f32,
    pub pitch: f32,
    pub yaw: f32,
}

impl Rotation {
    pub const ZERO: Rotation = Rotation::new(0.0, 0.0, 0.0);

    pub const fn new(roll: f32, pitch: f32, yaw: f32) -> Self {
        Self { roll, pitch, yaw }
    }

    pub fn from_pitch_yaw_roll(pitch: f32, yaw: f32, roll: f32) -> Self {
        Self { roll, pitch, yaw }
    }

    pub fn x(&self) -> f32 {
        self.pitch
    }

    pub fn y(&self) -> f32 {
        self.yaw
    }

    pub fn z(&self) -> f32 {
        self.roll
    }

    /// World-to-local rotation: roll about z, then yaw about y, then pitch about x.
    pub fn apply_inverse(&self, v: Vec3) -> Vec3 {
        let (sx, cx) = self.x().sin_cos();
        let (sy, cy) = self.y().sin_cos();
        let (sz, cz) = self.z().sin_cos();

        let dx = cy * (sz * v.y + cz * v.x) - sy * v.z;
        let tmp1 = cy * v.z + sy * (sz * v.y + cz * v.x);
        let tmp2 = cz * v.y - sz * v.x;
        let dy = sx * tmp1 + cx * tmp2;
        let dz = cx * tmp1 - sx * tmp2;

        Vec3::new(dx, dy, dz)
    }

    /// Local-to-world rotation, the transpose of [`Rotation::apply_inverse`].
    pub fn apply(&self, v: Vec3) -> Vec3 {
        let (sx, cx) = self.x().sin_cos();
        let (sy, cy) = self.y().sin_cos();
        let (sz, cz) = self.z().sin_cos();

        let tmp2 = cx * v.y - sx * v.z;
        let tmp1 = sx * v.y + cx * v.z;
        let a = cy * v.x + sy * tmp1;
        let z = cy * tmp1 - sy * v.x;
        let x = cz * a - sz * tmp2;
        let y = sz * a + cz * tmp2;

        Vec3::new(x, y, z)
    }
}

impl Add for Rotation {
    type Output = Rotation;

    fn add(self, other: Rotation) -> Rotation {
        Rotation::new(
            self.roll + other.roll,
            self.pitch + other.pitch,
            self.yaw + other.yaw,
        )
    }
}

impl AddAssign for Rotation {
    fn add_assign(&mut self, other: Rotation) {
        *self = *self + other;
    }
}
