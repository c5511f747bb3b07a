pub mod camera;
pub mod clip;
pub mod config;
pub mod drawing;
pub mod math;
pub mod turtle;

mod app;
mod app_state;
mod canvas;
mod event_handler;
mod renderer;
mod state;
mod update_logic;
mod vertex;

// Re-export the main public interface
pub use app::{load_program, run};
pub use camera::{Camera, CameraError, CameraField, Segment};
pub use clip::{ClipResult, MAX_CLIP_ITERATIONS, clip_line, clip_line_rounds};
pub use drawing::{Color, DrawOutcome, DrawSurface, DrawingContext, RecordingSurface};
pub use turtle::{Command, CommandLog, ParseError, Turn, Turtle2d, Turtle3d};
pub use vertex::Vertex;

// Re-export for WASM compatibility
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg_attr(target_arch = "wasm32", wasm_bindgen(start))]
pub async fn start() {
    run().await;
}
