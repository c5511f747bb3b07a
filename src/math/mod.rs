mod rotation;
mod vec2;
mod vec3;

pub use rotation::Rotation;
pub use vec2::Vec2;
pub use vec3::Vec3;

pub const PI: f32 = std::f32::consts::PI;

pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}
