use crate::camera::{Camera, CameraError, CameraField, Segment, UnknownField};
use crate::clip::{ClipResult, clip_line};
use crate::math::Vec2;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Linear RGBA stroke color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color(pub [f32; 4]);

impl Color {
    pub const BLACK: Color = Color([0.0, 0.0, 0.0, 1.0]);
    pub const WHITE: Color = Color([1.0, 1.0, 1.0, 1.0]);

    pub fn rgba(self) -> [f32; 4] {
        self.0
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid color `{0}`")]
pub struct InvalidColor(pub String);

impl FromStr for Color {
    type Err = InvalidColor;

    /// Parses `#rgb`, `#rrggbb`, `#rrggbbaa` or a basic color name.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidColor(text.to_string());

        if let Some(hex) = text.strip_prefix('#') {
            if !hex.is_ascii() {
                return Err(invalid());
            }
            let channel = |s: &str| u8::from_str_radix(s, 16).map(|v| v as f32 / 255.0);
            let rgba = match hex.len() {
                3 => {
                    let mut out = [1.0; 4];
                    for (i, c) in hex.chars().enumerate() {
                        let digit = c.to_digit(16).ok_or_else(invalid)?;
                        out[i] = (digit * 17) as f32 / 255.0;
                    }
                    out
                }
                6 | 8 => {
                    let mut out = [1.0; 4];
                    for i in 0..hex.len() / 2 {
                        out[i] = channel(&hex[i * 2..i * 2 + 2]).map_err(|_| invalid())?;
                    }
                    out
                }
                _ => return Err(invalid()),
            };
            return Ok(Color(rgba));
        }

        let rgb = match text {
            "black" => [0.0, 0.0, 0.0],
            "white" => [1.0, 1.0, 1.0],
            "red" => [1.0, 0.0, 0.0],
            "green" => [0.0, 0.5, 0.0],
            "blue" => [0.0, 0.0, 1.0],
            "yellow" => [1.0, 1.0, 0.0],
            "cyan" => [0.0, 1.0, 1.0],
            "magenta" => [1.0, 0.0, 1.0],
            "orange" => [1.0, 0.65, 0.0],
            "gray" | "grey" => [0.5, 0.5, 0.5],
            _ => return Err(invalid()),
        };
        Ok(Color([rgb[0], rgb[1], rgb[2], 1.0]))
    }
}

/// A 2D line-drawing backend.
///
/// Coordinates are pixels with the origin at the canvas center and y pointing up.
pub trait DrawSurface {
    fn clear_screen(&mut self);
    fn set_color(&mut self, color: Color);
    fn draw_segment(&mut self, begin: Vec2, end: Vec2);
}

impl<S: DrawSurface + ?Sized> DrawSurface for &mut S {
    fn clear_screen(&mut self) {
        (**self).clear_screen()
    }

    fn set_color(&mut self, color: Color) {
        (**self).set_color(color)
    }

    fn draw_segment(&mut self, begin: Vec2, end: Vec2) {
        (**self).draw_segment(begin, end)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear,
    SetColor(Color),
    Segment(Vec2, Vec2),
}

/// Keeps every call in order. Used for headless runs and tests.
#[derive(Debug, Default, Clone)]
pub struct RecordingSurface {
    pub calls: Vec<DrawCall>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> Vec<(Vec2, Vec2)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Segment(a, b) => Some((*a, *b)),
                _ => None,
            })
            .collect()
    }
}

impl DrawSurface for RecordingSurface {
    fn clear_screen(&mut self) {
        self.calls.push(DrawCall::Clear);
    }

    fn set_color(&mut self, color: Color) {
        self.calls.push(DrawCall::SetColor(color));
    }

    fn draw_segment(&mut self, begin: Vec2, end: Vec2) {
        self.calls.push(DrawCall::Segment(begin, end));
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColoredSegment {
    pub begin: Vec2,
    pub end: Vec2,
    pub color: Color,
}

/// Collects the current frame's segments for GPU upload.
#[derive(Debug, Default, Clone)]
pub struct SegmentBatch {
    pub segments: Vec<ColoredSegment>,
    color: Color,
}

impl SegmentBatch {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DrawSurface for SegmentBatch {
    fn clear_screen(&mut self) {
        self.segments.clear();
    }

    fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    fn draw_segment(&mut self, begin: Vec2, end: Vec2) {
        self.segments.push(ColoredSegment {
            begin,
            end,
            color: self.color,
        });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawOutcome {
    Drawn,
    /// Both endpoints nearer than the near plane.
    BehindCamera,
    /// Clipped away by the view cube.
    OutsideView,
    /// Clipping gave up; nothing was drawn.
    Unconverged,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PropertyError {
    #[error(transparent)]
    UnknownPath(#[from] UnknownField),
    #[error(transparent)]
    Camera(#[from] CameraError),
}

/// Runs world-space segments through the camera and clipper onto a surface.
pub struct DrawingContext<S: DrawSurface> {
    pub camera: Camera,
    surface: S,
    color: Color,
    half_width: f32,
    half_height: f32,
}

impl<S: DrawSurface> DrawingContext<S> {
    pub fn new(camera: Camera, surface: S, width: f32, height: f32) -> Self {
        Self {
            camera,
            surface,
            color: Color::default(),
            half_width: width / 2.0,
            half_height: height / 2.0,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.half_width = width / 2.0;
        self.half_height = height / 2.0;
    }

    pub fn clear_screen(&mut self) {
        self.surface.clear_screen();
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
        self.surface.set_color(color);
    }

    pub fn draw_line(&mut self, segment: Segment) -> DrawOutcome {
        let relative = [
            self.camera.relative_point(segment[0]),
            self.camera.relative_point(segment[1]),
        ];

        let Some(normalized) = self.camera.normalize_view_volume(relative) else {
            log::trace!("segment behind camera: {:?}", segment);
            return DrawOutcome::BehindCamera;
        };

        let [begin, end] = match clip_line(normalized) {
            ClipResult::Accepted(clipped) => clipped,
            ClipResult::Rejected => {
                log::trace!("segment outside view: {:?}", segment);
                return DrawOutcome::OutsideView;
            }
            ClipResult::Unconverged => return DrawOutcome::Unconverged,
        };

        let half_extent = Vec2::new(self.half_width, self.half_height);
        self.surface.draw_segment(
            Vec2::new(begin.x, begin.y).component_mul(half_extent),
            Vec2::new(end.x, end.y).component_mul(half_extent),
        );
        DrawOutcome::Drawn
    }

    /// Assigns a camera property addressed by a dotted path like `camera.position.x`.
    pub fn set_property(&mut self, path: &str, value: f32) -> Result<(), PropertyError> {
        let field: CameraField = path.parse()?;
        self.camera.set_field(field, value)?;
        Ok(())
    }

    pub fn transform_property(
        &mut self,
        path: &str,
        transform: impl FnOnce(f32) -> f32,
    ) -> Result<(), PropertyError> {
        let field: CameraField = path.parse()?;
        self.camera.update_field(field, transform)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Rotation, Vec3};

    fn context() -> DrawingContext<RecordingSurface> {
        let camera = Camera::new(Vec3::new(0.0, 0.0, -10.0), Rotation::ZERO, 1.0, 80.0).unwrap();
        DrawingContext::new(camera, RecordingSurface::new(), 800.0, 600.0)
    }

    #[test]
    fn test_color_specs() {
        assert_eq!("#ff0000".parse(), Ok(Color([1.0, 0.0, 0.0, 1.0])));
        assert_eq!("#fff".parse(), Ok(Color::WHITE));
        assert_eq!("#00000000".parse(), Ok(Color([0.0, 0.0, 0.0, 0.0])));
        assert_eq!("black".parse(), Ok(Color::BLACK));
        assert!("#12345".parse::<Color>().is_err());
        assert!("#gg0000".parse::<Color>().is_err());
        assert!("chartreuse".parse::<Color>().is_err());
    }

    #[test]
    fn test_draw_line_maps_to_pixels() {
        let mut ctx = context();
        // z = 10 in camera space; near/z = 0.1.
        let outcome = ctx.draw_line([Vec3::new(-4.0, 0.0, 0.0), Vec3::new(4.0, 3.0, 0.0)]);
        assert_eq!(outcome, DrawOutcome::Drawn);

        let segments = ctx.surface().segments();
        assert_eq!(segments.len(), 1);
        let (a, b) = segments[0];
        assert!((a.x - -0.4 * 400.0).abs() < 1e-3);
        assert!((b.x - 0.4 * 400.0).abs() < 1e-3);
        assert!((b.y - 0.3 * 300.0).abs() < 1e-3);
    }

    #[test]
    fn test_invisible_segments_draw_nothing() {
        let mut ctx = context();
        assert_eq!(
            ctx.draw_line([Vec3::new(0.0, 0.0, -20.0), Vec3::new(0.0, 0.0, -15.0)]),
            DrawOutcome::BehindCamera
        );
        assert_eq!(
            ctx.draw_line([Vec3::new(50.0, 0.0, 0.0), Vec3::new(60.0, 5.0, 0.0)]),
            DrawOutcome::OutsideView
        );
        assert!(ctx.surface().calls.is_empty());
    }

    #[test]
    fn test_set_color_reaches_surface() {
        let mut ctx = context();
        ctx.clear_screen();
        ctx.set_color(Color::WHITE);
        assert_eq!(ctx.color(), Color::WHITE);
        assert_eq!(
            ctx.surface().calls,
            vec![DrawCall::Clear, DrawCall::SetColor(Color::WHITE)]
        );
    }

    #[test]
    fn test_property_paths() {
        let mut ctx = context();
        ctx.set_property("camera.position.x", 3.0).unwrap();
        ctx.transform_property("camera.rotation.pitch", |p| p + 0.5)
            .unwrap();
        assert_eq!(ctx.camera.position().x, 3.0);
        assert_eq!(ctx.camera.rotation().pitch, 0.5);

        assert!(matches!(
            ctx.set_property("camera.lens", 1.0),
            Err(PropertyError::UnknownPath(_))
        ));
        assert!(matches!(
            ctx.set_property("camera.nearDistance", 0.0),
            Err(PropertyError::Camera(CameraError::InvalidNear(_)))
        ));
        assert_eq!(ctx.camera.near_distance(), 1.0);
    }

    #[test]
    fn test_resize_rescales_pixels() {
        let mut ctx = context();
        ctx.resize(200.0, 100.0);
        ctx.draw_line([Vec3::new(0.0, 0.0, 0.0), Vec3::new(10.0, 10.0, 0.0)]);
        // (10, 10, 10) in camera space projects to (1, 1): the top-right corner.
        assert_eq!(
            ctx.surface().segments(),
            vec![(Vec2::ZERO, Vec2::new(100.0, 50.0))]
        );
    }

    #[test]
    fn test_segment_batch_tracks_color() {
        let mut batch = SegmentBatch::new();
        batch.set_color(Color::WHITE);
        batch.draw_segment(Vec2::ZERO, Vec2::new(1.0, 0.0));
        assert_eq!(batch.segments[0].color, Color::WHITE);
        batch.clear_screen();
        assert!(batch.segments.is_empty());
    }
}
