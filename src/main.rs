use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

mod app;
mod capture;
mod error;
mod playback;
mod renderer;
mod rig;
mod settings;
mod ui;

use crate::error::PoseError;

/// confy application name shared by every settings section.
pub const CONFY_APP_NAME: &str = "posevis-rs";

struct AppHandler {
    app: Option<app::App>,
    capture_path: String,
    fatal: Option<PoseError>,
}

impl ApplicationHandler for AppHandler {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.app.is_none() && self.fatal.is_none() {
            let window_attrs = Window::default_attributes()
                .with_title("PoseVis-RS - Motion Capture Replay")
                .with_inner_size(winit::dpi::LogicalSize::new(1200.0, 800.0));

            let window = match event_loop.create_window(window_attrs) {
                Ok(window) => Arc::new(window),
                Err(err) => {
                    self.fatal = Some(err.into());
                    event_loop.exit();
                    return;
                }
            };

            match pollster::block_on(app::App::new(window, self.capture_path.clone())) {
                Ok(app) => self.app = Some(app),
                Err(err) => {
                    self.fatal = Some(err);
                    event_loop.exit();
                }
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(app) = &mut self.app {
            let response = app.handle_event(&event);
            if response.repaint {
                app.window.request_redraw();
            }
            if response.exit {
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(app) = &mut self.app {
            if let Err(e) = app.render() {
                log::error!("render error: {e:?}");
            }
            app.window.request_redraw();
        }
    }
}

fn run() -> crate::error::Result<()> {
    let capture_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| settings::PlaybackSettings::load().capture_path);

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut handler = AppHandler {
        app: None,
        capture_path,
        fatal: None,
    };
    event_loop.run_app(&mut handler)?;

    if let Some(err) = handler.fatal.take() {
        return Err(err);
    }
    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(err) = run() {
        log::error!("fatal {} error: {err}", err.class());
        std::process::exit(err.class().exit_code());
    }
}
