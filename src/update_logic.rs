use crate::app_state::State;
use crate::drawing::ColoredSegment;
use crate::vertex::Vertex;
use wgpu::util::DeviceExt;

cfg_if::cfg_if! {
    if #[cfg(target_arch = "wasm32")] {
        use web_time::Instant;
    } else {
        use std::time::Instant;
    }
}

impl State {
    pub fn update(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        if self.auto_rotate {
            let speed = self.config.viewer.rotate_speed;
            if let Err(err) = self
                .lab
                .transform_property("camera.rotation.yaw", |yaw| yaw + speed * dt)
            {
                log::warn!("auto-rotate: {err}");
            }
        }

        self.lab.clear_screen();
        self.turtle.replay(&mut self.lab);
        self.update_buffers();
    }

    fn update_buffers(&mut self) {
        // Keep strokes the same on-screen width at any zoom.
        let width = self.config.canvas.line_width / self.canvas.transform.scale;
        let (vertices, indices) = line_quads(&self.lab.surface().segments, width);

        if indices.is_empty() {
            self.geometry.vertex = None;
            self.geometry.index = None;
            self.geometry.count = 0;
            return;
        }

        self.geometry.vertex = Some(self.gpu.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Line Vertex Buffer"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            },
        ));

        self.geometry.index = Some(self.gpu.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Line Index Buffer"),
                contents: bytemuck::cast_slice(&indices),
                usage: wgpu::BufferUsages::INDEX,
            },
        ));

        self.geometry.count = indices.len() as u32;
    }
}

/// Expands each segment into a quad `width` wide, two triangles per segment.
pub fn line_quads(segments: &[ColoredSegment], width: f32) -> (Vec<Vertex>, Vec<u32>) {
    let mut vertices = Vec::with_capacity(segments.len() * 4);
    let mut indices = Vec::with_capacity(segments.len() * 6);
    let mut index_offset = 0u32;

    for segment in segments {
        let p1 = segment.begin;
        let p2 = segment.end;
        let color = segment.color.rgba();

        let dx = p2.x - p1.x;
        let dy = p2.y - p1.y;
        let len = (dx * dx + dy * dy).sqrt();
        if len <= 0.0 {
            continue;
        }

        let nx = -dy / len * width * 0.5;
        let ny = dx / len * width * 0.5;

        vertices.push(Vertex {
            position: [p1.x - nx, p1.y - ny],
            color,
        });
        vertices.push(Vertex {
            position: [p1.x + nx, p1.y + ny],
            color,
        });
        vertices.push(Vertex {
            position: [p2.x + nx, p2.y + ny],
            color,
        });
        vertices.push(Vertex {
            position: [p2.x - nx, p2.y - ny],
            color,
        });

        indices.extend_from_slice(&[
            index_offset,
            index_offset + 1,
            index_offset + 2,
            index_offset,
            index_offset + 2,
            index_offset + 3,
        ]);
        index_offset += 4;
    }

    (vertices, indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::Color;
    use crate::math::Vec2;

    #[test]
    fn test_horizontal_segment_quad() {
        let segments = [ColoredSegment {
            begin: Vec2::new(0.0, 0.0),
            end: Vec2::new(10.0, 0.0),
            color: Color::BLACK,
        }];
        let (vertices, indices) = line_quads(&segments, 2.0);

        assert_eq!(indices, vec![0, 1, 2, 0, 2, 3]);
        let positions: Vec<[f32; 2]> = vertices.iter().map(|v| v.position).collect();
        assert_eq!(
            positions,
            vec![[0.0, -1.0], [0.0, 1.0], [10.0, 1.0], [10.0, -1.0]]
        );
        assert!(vertices.iter().all(|v| v.color == [0.0, 0.0, 0.0, 1.0]));
    }

    #[test]
    fn test_degenerate_segments_skipped() {
        let point = ColoredSegment {
            begin: Vec2::new(3.0, 3.0),
            end: Vec2::new(3.0, 3.0),
            color: Color::WHITE,
        };
        let line = ColoredSegment {
            begin: Vec2::ZERO,
            end: Vec2::new(0.0, 5.0),
            color: Color::WHITE,
        };
        let (vertices, indices) = line_quads(&[point, line], 1.0);
        assert_eq!(vertices.len(), 4);
        assert_eq!(indices, vec![0, 1, 2, 0, 2, 3]);
    }
}
