use crate::math::{Vec2, clamp};

pub const MIN_SCALE: f32 = 0.1;
pub const MAX_SCALE: f32 = 10.0;

/// Pan and zoom between canvas coordinates (centered, y up) and window pixels (top-left, y down).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasTransform {
    pub offset: [f32; 2],
    pub scale: f32,
}

impl Default for CanvasTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasTransform {
    pub fn new() -> Self {
        Self {
            offset: [0.0, 0.0],
            scale: 1.0,
        }
    }

    pub fn screen_to_canvas(&self, screen_pos: [f32; 2], window_size: (f32, f32)) -> Vec2 {
        Vec2::new(
            (screen_pos[0] - window_size.0 / 2.0 - self.offset[0]) / self.scale,
            -(screen_pos[1] - window_size.1 / 2.0 - self.offset[1]) / self.scale,
        )
    }

    pub fn canvas_to_screen(&self, canvas_pos: Vec2, window_size: (f32, f32)) -> [f32; 2] {
        [
            window_size.0 / 2.0 + self.offset[0] + canvas_pos.x * self.scale,
            window_size.1 / 2.0 + self.offset[1] - canvas_pos.y * self.scale,
        ]
    }

    /// Zooms by `factor`, keeping the canvas point under `screen_pos` in place.
    pub fn zoom_at(&mut self, screen_pos: [f32; 2], factor: f32, window_size: (f32, f32)) {
        let before = self.screen_to_canvas(screen_pos, window_size);
        self.scale = clamp(self.scale * factor, MIN_SCALE, MAX_SCALE);
        let after = self.canvas_to_screen(before, window_size);
        self.offset[0] += screen_pos[0] - after[0];
        self.offset[1] += screen_pos[1] - after[1];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: (f32, f32) = (800.0, 600.0);

    #[test]
    fn test_origin_is_window_center() {
        let transform = CanvasTransform::new();
        assert_eq!(transform.canvas_to_screen(Vec2::ZERO, WINDOW), [400.0, 300.0]);
        assert_eq!(
            transform.canvas_to_screen(Vec2::new(10.0, 10.0), WINDOW),
            [410.0, 290.0]
        );
    }

    #[test]
    fn test_round_trip() {
        let transform = CanvasTransform {
            offset: [12.0, -30.0],
            scale: 2.5,
        };
        let p = Vec2::new(-7.0, 3.0);
        let back = transform.screen_to_canvas(transform.canvas_to_screen(p, WINDOW), WINDOW);
        assert!((back - p).length() < 1e-4);
    }

    #[test]
    fn test_zoom_keeps_cursor_point() {
        let mut transform = CanvasTransform::new();
        let cursor = [600.0, 100.0];
        let before = transform.screen_to_canvas(cursor, WINDOW);
        transform.zoom_at(cursor, 1.5, WINDOW);
        let after = transform.screen_to_canvas(cursor, WINDOW);
        assert!((before - after).length() < 1e-3);
        assert_eq!(transform.scale, 1.5);

        transform.zoom_at(cursor, 100.0, WINDOW);
        assert_eq!(transform.scale, MAX_SCALE);
    }
}
