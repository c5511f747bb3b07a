use crate::app_state::State;
use crate::config::LabConfig;
use crate::turtle::{CommandLog, parse_program};
use anyhow::Context;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{JsCast, prelude::*};

const DEMO_PROGRAM: &str = include_str!("../data/scripts/cube_spiral.turtle");

/// Parses a turtle program: a saved JSON command log or the text language.
pub fn load_program(source: &str, is_json: bool) -> anyhow::Result<CommandLog> {
    if is_json {
        CommandLog::from_json(source).context("invalid command log")
    } else {
        Ok(CommandLog::from(parse_program(source)?))
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn load_lab() -> anyhow::Result<(LabConfig, CommandLog)> {
    let config = match std::env::var_os("LINELAB_CONFIG") {
        Some(path) => {
            log::info!("Loading config from {}", path.to_string_lossy());
            LabConfig::load(&path)?
        }
        None => LabConfig::default(),
    };

    let program = match &config.script {
        Some(path) => {
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read script {}", path.display()))?;
            let is_json = path.extension().is_some_and(|ext| ext == "json");
            load_program(&source, is_json)
                .with_context(|| format!("failed to load script {}", path.display()))?
        }
        None => load_program(DEMO_PROGRAM, false)?,
    };

    Ok((config, program))
}

#[cfg(target_arch = "wasm32")]
fn load_lab() -> anyhow::Result<(LabConfig, CommandLog)> {
    Ok((LabConfig::default(), load_program(DEMO_PROGRAM, false)?))
}

struct App {
    state: Option<State>,
    config: LabConfig,
    program: CommandLog,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_none() {
            let window_attributes = Window::default_attributes()
                .with_title("linelab")
                .with_inner_size(winit::dpi::LogicalSize::new(
                    self.config.canvas.width,
                    self.config.canvas.height,
                ));

            let window = event_loop.create_window(window_attributes).unwrap();

            #[cfg(target_arch = "wasm32")]
            {
                use winit::platform::web::WindowExtWebSys;

                let canvas = web_sys::Element::from(window.canvas().unwrap());
                let canvas_html: web_sys::HtmlCanvasElement = canvas.clone().dyn_into().unwrap();

                web_sys::window()
                    .and_then(|win| win.document())
                    .and_then(|doc| {
                        let dst = doc.get_element_by_id("wasm-example")?;
                        dst.append_child(&canvas).ok()?;
                        Some(())
                    })
                    .expect("Couldn't append canvas to document body.");

                canvas_html.set_width(self.config.canvas.width);
                canvas_html.set_height(self.config.canvas.height);
                canvas_html.style().set_property("display", "block").unwrap();
            }

            let config = self.config.clone();
            let program = std::mem::take(&mut self.program);
            pollster::block_on(async {
                self.state = Some(State::new(Arc::new(window), config, program).await);
            });
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        if let Some(state) = &mut self.state {
            if window_id == state.window().id() {
                if !state.input(&event) {
                    match event {
                        WindowEvent::CloseRequested
                        | WindowEvent::KeyboardInput {
                            event:
                                KeyEvent {
                                    state: ElementState::Pressed,
                                    physical_key: PhysicalKey::Code(KeyCode::Escape),
                                    ..
                                },
                            ..
                        } => event_loop.exit(),
                        WindowEvent::Resized(physical_size) => {
                            log::info!("WindowEvent::Resized: {}x{}", physical_size.width, physical_size.height);
                            state.resize(physical_size);
                        }
                        WindowEvent::RedrawRequested => {
                            state.update();
                            match state.render() {
                                Ok(_) => {}
                                Err(wgpu::SurfaceError::Lost) => state.resize(state.size),
                                Err(wgpu::SurfaceError::OutOfMemory) => event_loop.exit(),
                                Err(e) => log::error!("{:?}", e),
                            }
                        }
                        _ => {}
                    }
                }
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window().request_redraw();
        }
    }
}

pub async fn run() {
    cfg_if::cfg_if! {
        if #[cfg(target_arch = "wasm32")] {
            std::panic::set_hook(Box::new(console_error_panic_hook::hook));
            console_log::init_with_level(log::Level::Info).expect("Couldn't initialize logger");
        } else {
            env_logger::init();
        }
    }

    let (config, program) = load_lab().unwrap_or_else(|err| {
        log::error!("{err:#}; falling back to the demo program");
        let program = load_program(DEMO_PROGRAM, false).unwrap_or_default();
        (LabConfig::default(), program)
    });

    let event_loop = EventLoop::new().unwrap();
    let mut app = App {
        state: None,
        config,
        program,
    };

    event_loop.run_app(&mut app).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_program_parses() {
        let program = load_program(DEMO_PROGRAM, false).unwrap();
        assert!(program.len() > 20);
    }

    #[test]
    fn test_load_json_program() {
        let log = load_program("FORWARD 1\nROTATE 45", false).unwrap();
        let json = log.to_json().unwrap();
        assert_eq!(load_program(&json, true).unwrap(), log);
        assert!(load_program("FORWARD 1", true).is_err());
        assert!(load_program("FOO 1 2", false).is_err());
    }
}
