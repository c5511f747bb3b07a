use crate::math::{Rotation, Vec2, Vec3};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A line segment. Both endpoints always travel through the pipeline together.
pub type Segment = [Vec3; 2];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CameraError {
    #[error("near distance must be positive and finite, got {0}")]
    InvalidNear(f32),
    #[error("far distance must be finite, got {0}")]
    InvalidFar(f32),
    #[error("near distance {near} must be less than far distance {far}")]
    NearNotBeforeFar { near: f32, far: f32 },
    #[error("{field} must be finite, got {value}")]
    NotFinite { field: CameraField, value: f32 },
}

/// Pinhole camera with a linear depth range between `near_distance` and `far_distance`.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    position: Vec3,
    rotation: Rotation,
    near_distance: f32,
    far_distance: f32,
}

impl Camera {
    pub fn new(
        position: Vec3,
        rotation: Rotation,
        near_distance: f32,
        far_distance: f32,
    ) -> Result<Self, CameraError> {
        validate_position(position)?;
        validate_rotation(rotation)?;
        validate_depth(near_distance, far_distance)?;
        Ok(Self {
            position,
            rotation,
            near_distance,
            far_distance,
        })
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn near_distance(&self) -> f32 {
        self.near_distance
    }

    pub fn far_distance(&self) -> f32 {
        self.far_distance
    }

    pub fn set_position(&mut self, position: Vec3) -> Result<(), CameraError> {
        validate_position(position)?;
        self.position = position;
        Ok(())
    }

    pub fn set_rotation(&mut self, rotation: Rotation) -> Result<(), CameraError> {
        validate_rotation(rotation)?;
        self.rotation = rotation;
        Ok(())
    }

    pub fn set_depth_range(&mut self, near: f32, far: f32) -> Result<(), CameraError> {
        validate_depth(near, far)?;
        self.near_distance = near;
        self.far_distance = far;
        Ok(())
    }

    /// Expresses a world-space point in camera space.
    pub fn relative_point(&self, point: Vec3) -> Vec3 {
        self.rotation.apply_inverse(point - self.position)
    }

    /// Perspective divide onto the near plane. `p.z` must be positive.
    pub fn projection(&self, p: Vec3) -> Vec2 {
        let factor = self.near_distance / p.z;
        Vec2::new(factor * p.x, factor * p.y)
    }

    /// Projects x/y and remaps depth affinely so the near..far range spans [-1, 1].
    pub fn normalize_view_volume_point(&self, p: Vec3) -> Vec3 {
        let projected = self.projection(p);
        let midpoint = (self.far_distance + self.near_distance) / 2.0;
        let range = self.far_distance - self.near_distance;
        Vec3::new(projected.x, projected.y, (p.z - midpoint) / range)
    }

    /// Normalizes a camera-space segment, cutting it at the near plane first.
    ///
    /// Returns `None` when both endpoints are nearer than the near plane.
    pub fn normalize_view_volume(&self, segment: Segment) -> Option<Segment> {
        let [mut begin, mut end] = segment;
        let near = self.near_distance;

        match (begin.z < near, end.z < near) {
            (true, true) => return None,
            (true, false) => begin = near_plane_intersection(end, begin, near),
            (false, true) => end = near_plane_intersection(begin, end, near),
            (false, false) => {}
        }

        Some([
            self.normalize_view_volume_point(begin),
            self.normalize_view_volume_point(end),
        ])
    }

    pub fn field(&self, field: CameraField) -> f32 {
        match field {
            CameraField::PositionX => self.position.x,
            CameraField::PositionY => self.position.y,
            CameraField::PositionZ => self.position.z,
            CameraField::RotationPitch => self.rotation.pitch,
            CameraField::RotationYaw => self.rotation.yaw,
            CameraField::RotationRoll => self.rotation.roll,
            CameraField::NearDistance => self.near_distance,
            CameraField::FarDistance => self.far_distance,
        }
    }

    /// Assigns a single scalar, rejecting values that would break the depth range.
    pub fn set_field(&mut self, field: CameraField, value: f32) -> Result<(), CameraError> {
        if !value.is_finite() {
            return Err(CameraError::NotFinite { field, value });
        }
        match field {
            CameraField::PositionX => self.position.x = value,
            CameraField::PositionY => self.position.y = value,
            CameraField::PositionZ => self.position.z = value,
            CameraField::RotationPitch => self.rotation.pitch = value,
            CameraField::RotationYaw => self.rotation.yaw = value,
            CameraField::RotationRoll => self.rotation.roll = value,
            CameraField::NearDistance => self.set_depth_range(value, self.far_distance)?,
            CameraField::FarDistance => self.set_depth_range(self.near_distance, value)?,
        }
        Ok(())
    }

    pub fn update_field(
        &mut self,
        field: CameraField,
        transform: impl FnOnce(f32) -> f32,
    ) -> Result<(), CameraError> {
        let value = transform(self.field(field));
        self.set_field(field, value)
    }
}

fn validate_finite(fields: [(CameraField, f32); 3]) -> Result<(), CameraError> {
    match fields.into_iter().find(|(_, value)| !value.is_finite()) {
        Some((field, value)) => Err(CameraError::NotFinite { field, value }),
        None => Ok(()),
    }
}

fn validate_position(position: Vec3) -> Result<(), CameraError> {
    validate_finite([
        (CameraField::PositionX, position.x),
        (CameraField::PositionY, position.y),
        (CameraField::PositionZ, position.z),
    ])
}

fn validate_rotation(rotation: Rotation) -> Result<(), CameraError> {
    validate_finite([
        (CameraField::RotationPitch, rotation.pitch),
        (CameraField::RotationYaw, rotation.yaw),
        (CameraField::RotationRoll, rotation.roll),
    ])
}

fn validate_depth(near: f32, far: f32) -> Result<(), CameraError> {
    if !(near.is_finite() && near > 0.0) {
        return Err(CameraError::InvalidNear(near));
    }
    if !far.is_finite() {
        return Err(CameraError::InvalidFar(far));
    }
    if near >= far {
        return Err(CameraError::NearNotBeforeFar { near, far });
    }
    Ok(())
}

// `inside.z >= near > outside.z`, so the denominator is non-zero.
fn near_plane_intersection(inside: Vec3, outside: Vec3, near: f32) -> Vec3 {
    let t = (near - inside.z) / (outside.z - inside.z);
    let mut point = inside.lerp(outside, t);
    point.z = near;
    point
}

/// Scalar camera properties addressable from UI bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraField {
    PositionX,
    PositionY,
    PositionZ,
    RotationPitch,
    RotationYaw,
    RotationRoll,
    NearDistance,
    FarDistance,
}

impl CameraField {
    pub const ALL: [CameraField; 8] = [
        CameraField::PositionX,
        CameraField::PositionY,
        CameraField::PositionZ,
        CameraField::RotationPitch,
        CameraField::RotationYaw,
        CameraField::RotationRoll,
        CameraField::NearDistance,
        CameraField::FarDistance,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            CameraField::PositionX => "camera.position.x",
            CameraField::PositionY => "camera.position.y",
            CameraField::PositionZ => "camera.position.z",
            CameraField::RotationPitch => "camera.rotation.pitch",
            CameraField::RotationYaw => "camera.rotation.yaw",
            CameraField::RotationRoll => "camera.rotation.roll",
            CameraField::NearDistance => "camera.nearDistance",
            CameraField::FarDistance => "camera.farDistance",
        }
    }
}

impl fmt::Display for CameraField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown camera property path `{0}`")]
pub struct UnknownField(pub String);

impl FromStr for CameraField {
    type Err = UnknownField;

    /// Accepts dotted paths such as `camera.position.x` or `rotation.yaw`.
    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let trimmed = path.trim();
        let relative = trimmed.strip_prefix("camera.").unwrap_or(trimmed);
        let segments: Vec<&str> = relative.split('.').collect();

        let field = match segments.as_slice() {
            ["position", "x"] => CameraField::PositionX,
            ["position", "y"] => CameraField::PositionY,
            ["position", "z"] => CameraField::PositionZ,
            ["rotation", "pitch" | "x"] => CameraField::RotationPitch,
            ["rotation", "yaw" | "y"] => CameraField::RotationYaw,
            ["rotation", "roll" | "z"] => CameraField::RotationRoll,
            ["nearDistance" | "near_distance"] => CameraField::NearDistance,
            ["farDistance" | "far_distance"] => CameraField::FarDistance,
            _ => return Err(UnknownField(path.to_string())),
        };
        Ok(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::PI;

    fn test_camera() -> Camera {
        Camera::new(Vec3::new(0.0, 0.0, -10.0), Rotation::ZERO, 1.0, 80.0).unwrap()
    }

    #[test]
    fn test_relative_point_translates() {
        let camera = test_camera();
        let rel = camera.relative_point(Vec3::new(1.0, 2.0, 5.0));
        assert_eq!(rel, Vec3::new(1.0, 2.0, 15.0));
    }

    #[test]
    fn test_relative_point_matches_closed_form() {
        let rotation = Rotation::from_pitch_yaw_roll(0.3, -0.4, 0.5);
        let camera = Camera::new(Vec3::new(1.0, 1.0, 1.0), rotation, 1.0, 10.0).unwrap();
        let p = Vec3::new(2.0, -1.0, 4.0);
        let d = p - camera.position();

        let (sx, cx) = (0.3f32.sin(), 0.3f32.cos());
        let (sy, cy) = ((-0.4f32).sin(), (-0.4f32).cos());
        let (sz, cz) = (0.5f32.sin(), 0.5f32.cos());
        let dx = cy * (sz * d.y + cz * d.x) - sy * d.z;
        let tmp1 = cy * d.z + sy * (sz * d.y + cz * d.x);
        let tmp2 = cz * d.y - sz * d.x;

        let rel = camera.relative_point(p);
        assert_eq!(rel.x, dx);
        assert_eq!(rel.y, sx * tmp1 + cx * tmp2);
        assert_eq!(rel.z, cx * tmp1 - sx * tmp2);
    }

    #[test]
    fn test_projection_is_exact_perspective_divide() {
        let camera = Camera::new(Vec3::ZERO, Rotation::ZERO, 2.0, 50.0).unwrap();
        for p in [
            Vec3::new(3.0, -4.0, 5.0),
            Vec3::new(0.5, 0.25, 2.5),
            Vec3::new(-7.0, 11.0, 49.0),
        ] {
            let projected = camera.projection(p);
            assert_eq!(projected.x, 2.0 / p.z * p.x);
            assert_eq!(projected.y, 2.0 / p.z * p.y);
        }
    }

    #[test]
    fn test_depth_remap_spans_unit_range() {
        let camera = Camera::new(Vec3::ZERO, Rotation::ZERO, 1.0, 81.0).unwrap();
        assert_eq!(camera.normalize_view_volume_point(Vec3::new(0.0, 0.0, 1.0)).z, -0.5);
        assert_eq!(camera.normalize_view_volume_point(Vec3::new(0.0, 0.0, 41.0)).z, 0.0);
        assert_eq!(camera.normalize_view_volume_point(Vec3::new(0.0, 0.0, 81.0)).z, 0.5);
    }

    #[test]
    fn test_normalize_rejects_only_when_both_behind_near() {
        let camera = test_camera();
        assert!(camera
            .normalize_view_volume([Vec3::new(0.0, 0.0, 0.5), Vec3::new(1.0, 0.0, -3.0)])
            .is_none());
        assert!(camera
            .normalize_view_volume([Vec3::new(0.0, 0.0, 0.5), Vec3::new(0.0, 0.0, 1.0)])
            .is_some());
        assert!(camera
            .normalize_view_volume([Vec3::new(0.0, 0.0, 2.0), Vec3::new(0.0, 0.0, 3.0)])
            .is_some());
    }

    #[test]
    fn test_normalize_cuts_at_near_plane() {
        let camera = Camera::new(Vec3::ZERO, Rotation::ZERO, 1.0, 9.0).unwrap();
        let [begin, end] = camera
            .normalize_view_volume([Vec3::new(2.0, 0.0, -1.0), Vec3::new(2.0, 4.0, 3.0)])
            .unwrap();

        // Cut at z == 1, halfway along: (2, 2, 1) projects to itself on the near plane.
        assert!((begin.x - 2.0).abs() < 1e-5);
        assert!((begin.y - 2.0).abs() < 1e-5);
        assert!((begin.z - (1.0 - 5.0) / 8.0).abs() < 1e-5);
        assert!((end.x - 2.0 / 3.0).abs() < 1e-5);
        assert!((end.y - 4.0 / 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_invalid_depth_range_rejected() {
        assert_eq!(
            Camera::new(Vec3::ZERO, Rotation::ZERO, 0.0, 10.0),
            Err(CameraError::InvalidNear(0.0))
        );
        assert_eq!(
            Camera::new(Vec3::ZERO, Rotation::ZERO, 5.0, 5.0),
            Err(CameraError::NearNotBeforeFar { near: 5.0, far: 5.0 })
        );
        assert!(Camera::new(Vec3::ZERO, Rotation::ZERO, 1.0, f32::INFINITY).is_err());

        let mut camera = test_camera();
        assert!(camera.set_field(CameraField::NearDistance, 100.0).is_err());
        assert!(camera.set_field(CameraField::FarDistance, -1.0).is_err());
        assert!(camera.set_field(CameraField::PositionX, f32::NAN).is_err());
        assert_eq!(camera, test_camera());
    }

    #[test]
    fn test_non_finite_pose_rejected() {
        let mut camera = test_camera();
        assert_eq!(
            camera.set_position(Vec3::new(0.0, f32::INFINITY, 0.0)),
            Err(CameraError::NotFinite {
                field: CameraField::PositionY,
                value: f32::INFINITY
            })
        );
        assert!(matches!(
            camera.set_rotation(Rotation::from_pitch_yaw_roll(0.0, 0.0, f32::NAN)),
            Err(CameraError::NotFinite {
                field: CameraField::RotationRoll,
                ..
            })
        ));
        assert_eq!(camera, test_camera());

        assert!(
            Camera::new(Vec3::new(f32::NAN, 0.0, 0.0), Rotation::ZERO, 1.0, 10.0).is_err()
        );

        camera.set_position(Vec3::new(1.0, 2.0, 3.0)).unwrap();
        camera.set_rotation(Rotation::new(0.1, 0.2, 0.3)).unwrap();
        assert_eq!(camera.position(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(camera.rotation().x(), 0.2);
    }

    #[test]
    fn test_field_paths() {
        for field in CameraField::ALL {
            assert_eq!(field.path().parse::<CameraField>(), Ok(field));
        }
        assert_eq!("rotation.x".parse(), Ok(CameraField::RotationPitch));
        assert_eq!("camera.rotation.y".parse(), Ok(CameraField::RotationYaw));
        assert_eq!("camera.near_distance".parse(), Ok(CameraField::NearDistance));
        assert!("camera.position.w".parse::<CameraField>().is_err());
        assert!("camera".parse::<CameraField>().is_err());
    }

    #[test]
    fn test_update_field_transforms_value() {
        let mut camera = test_camera();
        camera
            .update_field(CameraField::RotationYaw, |yaw| yaw + PI)
            .unwrap();
        camera
            .update_field(CameraField::PositionZ, |z| z * 2.0)
            .unwrap();
        assert_eq!(camera.rotation().yaw, PI);
        assert_eq!(camera.position().z, -20.0);
    }
}
