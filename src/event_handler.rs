use crate::app_state::State;
use crate::camera::CameraField;
use crate::config::ViewerConfig;

use winit::event::*;
use winit::keyboard::{KeyCode, PhysicalKey};

const NEAR_STEP: f32 = 0.1;
const FAR_STEP: f32 = 5.0;

/// Camera property nudged by a key, and by how much per press.
pub fn camera_binding(key: KeyCode, viewer: &ViewerConfig) -> Option<(CameraField, f32)> {
    let turn = viewer.turn_step;
    let step = viewer.move_step;
    let binding = match key {
        KeyCode::ArrowLeft => (CameraField::RotationYaw, -turn),
        KeyCode::ArrowRight => (CameraField::RotationYaw, turn),
        KeyCode::ArrowUp => (CameraField::RotationPitch, -turn),
        KeyCode::ArrowDown => (CameraField::RotationPitch, turn),
        KeyCode::KeyQ => (CameraField::RotationRoll, -turn),
        KeyCode::KeyE => (CameraField::RotationRoll, turn),
        KeyCode::KeyW => (CameraField::PositionZ, step),
        KeyCode::KeyS => (CameraField::PositionZ, -step),
        KeyCode::KeyA => (CameraField::PositionX, -step),
        KeyCode::KeyD => (CameraField::PositionX, step),
        KeyCode::PageUp => (CameraField::PositionY, step),
        KeyCode::PageDown => (CameraField::PositionY, -step),
        KeyCode::BracketLeft => (CameraField::NearDistance, -NEAR_STEP),
        KeyCode::BracketRight => (CameraField::NearDistance, NEAR_STEP),
        KeyCode::Minus => (CameraField::FarDistance, -FAR_STEP),
        KeyCode::Equal => (CameraField::FarDistance, FAR_STEP),
        _ => return None,
    };
    Some(binding)
}

impl State {
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.gpu.config.width = new_size.width;
            self.gpu.config.height = new_size.height;
            self.gpu
                .surface
                .configure(&self.gpu.device, &self.gpu.config);

            let window_size = self.window_size();
            self.canvas.write_uniform(&self.gpu.queue, window_size);
            self.lab.resize(window_size.0, window_size.1);
        }
    }

    /// Returns `true` when the event was consumed.
    pub fn input(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::ModifiersChanged(modifiers) => {
                self.input.modifiers = modifiers.state();
                false
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(key),
                        ..
                    },
                ..
            } => self.handle_key(*key),
            WindowEvent::MouseInput { state, button, .. } => {
                let pans = match button {
                    MouseButton::Middle => true,
                    MouseButton::Left => self.input.modifiers.shift_key(),
                    _ => false,
                };
                if !pans && self.input.pan_start.is_none() {
                    return false;
                }
                match state {
                    ElementState::Pressed => {
                        self.input.pan_start =
                            Some((self.input.mouse_pos, self.canvas.transform.offset));
                    }
                    ElementState::Released => {
                        self.input.pan_start = None;
                    }
                }
                true
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.input.mouse_pos = [position.x as f32, position.y as f32];

                if let Some((start_mouse, start_offset)) = self.input.pan_start {
                    self.canvas.transform.offset[0] =
                        start_offset[0] + (self.input.mouse_pos[0] - start_mouse[0]);
                    self.canvas.transform.offset[1] =
                        start_offset[1] + (self.input.mouse_pos[1] - start_mouse[1]);

                    let window_size = self.window_size();
                    self.canvas.write_uniform(&self.gpu.queue, window_size);
                }
                true
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let zoom_factor = match delta {
                    MouseScrollDelta::LineDelta(_, y) => 1.0 + y * 0.1,
                    MouseScrollDelta::PixelDelta(pos) => 1.0 + pos.y as f32 * 0.001,
                };

                let window_size = self.window_size();
                self.canvas
                    .transform
                    .zoom_at(self.input.mouse_pos, zoom_factor, window_size);
                self.canvas.write_uniform(&self.gpu.queue, window_size);
                true
            }
            _ => false,
        }
    }

    fn handle_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Space => {
                self.auto_rotate = !self.auto_rotate;
                log::info!("Auto-rotate {}", if self.auto_rotate { "on" } else { "off" });
                true
            }
            KeyCode::KeyR => {
                self.lab.camera = self.home_camera.clone();
                log::info!("Camera reset");
                true
            }
            _ => {
                let Some((field, delta)) = camera_binding(key, &self.config.viewer) else {
                    return false;
                };
                if let Err(err) = self.lab.transform_property(field.path(), |v| v + delta) {
                    log::warn!("Ignoring camera update: {err}");
                }
                true
            }
        }
    }
}
