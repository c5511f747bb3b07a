use wgpu::{BindGroup, Buffer, Device, Queue, RenderPipeline, Surface, SurfaceConfiguration};
use winit::keyboard::ModifiersState;

use crate::canvas::{CanvasTransform, Uniforms};

pub struct GpuContext {
    pub surface: Surface<'static>,
    pub device: Device,
    pub queue: Queue,
    pub config: SurfaceConfiguration,
    pub line_pipeline: RenderPipeline,
}

pub struct Canvas {
    pub transform: CanvasTransform,
    pub uniform: Uniforms,
    pub uniform_buffer: Buffer,
    pub uniform_bind_group: BindGroup,
}

impl Canvas {
    pub fn write_uniform(&mut self, queue: &Queue, window_size: (f32, f32)) {
        self.uniform.update_transform(&self.transform, window_size);
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}

pub struct GeometryBuffers {
    pub vertex: Option<Buffer>,
    pub index: Option<Buffer>,
    pub count: u32,
}

pub struct InputState {
    pub mouse_pos: [f32; 2],
    pub modifiers: ModifiersState,
    pub pan_start: Option<([f32; 2], [f32; 2])>,
}
