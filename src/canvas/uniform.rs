use crate::canvas::CanvasTransform;

/// Maps canvas coordinates to clip space: `clip = (pos * scale + pan) / half_viewport`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Uniforms {
    /// Pan in clip-space orientation (x right, y up), zoom scale, padding.
    view: [f32; 4],
    /// Half the window size in pixels, padding.
    half_viewport: [f32; 4],
}

impl Uniforms {
    pub fn new() -> Self {
        Self {
            view: [0.0, 0.0, 1.0, 0.0],
            half_viewport: [1.0, 1.0, 0.0, 0.0],
        }
    }

    pub fn update_transform(
        &mut self,
        canvas_transform: &CanvasTransform,
        window_size: (f32, f32),
    ) {
        self.view = [
            canvas_transform.offset[0],
            -canvas_transform.offset[1],
            canvas_transform.scale,
            0.0,
        ];
        self.half_viewport = [
            (window_size.0 / 2.0).max(1.0),
            (window_size.1 / 2.0).max(1.0),
            0.0,
            0.0,
        ];
    }

    /// CPU mirror of the vertex shader.
    #[cfg(test)]
    pub fn to_clip(&self, position: [f32; 2]) -> [f32; 2] {
        [
            (position[0] * self.view[2] + self.view[0]) / self.half_viewport[0],
            (position[1] * self.view[2] + self.view[1]) / self.half_viewport[1],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec2;

    #[test]
    fn test_clip_agrees_with_screen_mapping() {
        let window = (800.0, 600.0);
        let transform = CanvasTransform {
            offset: [40.0, -20.0],
            scale: 2.0,
        };
        let mut uniforms = Uniforms::new();
        uniforms.update_transform(&transform, window);

        let p = Vec2::new(30.0, -50.0);
        let screen = transform.canvas_to_screen(p, window);
        let clip = uniforms.to_clip(p.into());
        let expected = [
            screen[0] / (window.0 / 2.0) - 1.0,
            1.0 - screen[1] / (window.1 / 2.0),
        ];
        assert!((clip[0] - expected[0]).abs() < 1e-5);
        assert!((clip[1] - expected[1]).abs() < 1e-5);
    }
}
