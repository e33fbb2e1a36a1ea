use std::sync::Arc;
use std::time::Instant;

use egui_wgpu::ScreenDescriptor;
use egui_winit::State;

use crate::capture::Recording;
use crate::playback::Player;
use crate::renderer::Renderer;
use crate::renderer::camera::{CameraController, CameraState};
use crate::rig::{Rig, RigConfig};
use crate::settings::Settings;
use crate::ui::{Ui, UiActions};

pub struct EventResponse {
    pub repaint: bool,
    pub exit: bool,
}

pub struct App {
    pub window: Arc<winit::window::Window>,
    renderer: Renderer,
    camera_controller: CameraController,
    recording: Recording,
    capture_path: String,
    rig: Rig,
    player: Player,
    ui: Ui,
    egui_state: State,
    egui_wants_pointer: bool,
    settings: Settings,
    last_frame: Instant,
}

impl App {
    pub async fn new(
        window: Arc<winit::window::Window>,
        capture_path: String,
    ) -> crate::error::Result<Self> {
        let renderer = Renderer::new(window.clone()).await?;

        let egui_ctx = renderer.egui_context();

        // Multi-pass layout for collapsing headers, auto-sized windows, etc.
        egui_ctx.options_mut(|options| {
            options.max_passes = std::num::NonZero::new(2).unwrap();
        });

        let egui_state = State::new(
            egui_ctx.clone(),
            egui::viewport::ViewportId::ROOT,
            &window,
            None,
            None,
            None,
        );

        let settings = Settings::load();

        let mut recording = Recording::load(&capture_path)?;
        if recording.is_empty() {
            log::warn!("capture '{capture_path}' holds no records");
        }
        if settings.playback.interpolate_ball {
            let filled = recording.interpolate_ball_gaps();
            if filled > 0 {
                log::info!("interpolated ball position on {filled} records");
            }
        }

        let mut rig = Rig::new(RigConfig::default())?;
        if let Some(record) = recording.get(0) {
            rig.apply(record);
        }
        log::debug!(
            "rig ready: {} joints, {} skeleton segments",
            rig.joint_count(),
            crate::rig::EDGE_COUNT
        );

        let mut player = Player::new(recording.len());
        player.set_looping(settings.playback.loop_enabled);

        let mut camera_controller = CameraController::new(CameraState::default());
        if let Some((min, max)) = recording.bounds() {
            camera_controller.frame(min, max);
        }

        let mut app = Self {
            window,
            renderer,
            camera_controller,
            recording,
            capture_path,
            rig,
            player,
            ui: Ui::new(),
            egui_state,
            egui_wants_pointer: false,
            settings,
            last_frame: Instant::now(),
        };

        // Initialize renderer colors from loaded settings
        app.renderer.update_colors(&app.settings);

        Ok(app)
    }

    pub fn handle_event(&mut self, event: &winit::event::WindowEvent) -> EventResponse {
        // Let egui handle the event first
        let egui_response = self.egui_state.on_window_event(&self.window, event);
        let egui_wants_input = egui_response.consumed;

        match event {
            winit::event::WindowEvent::CloseRequested => {
                return EventResponse {
                    repaint: false,
                    exit: true,
                };
            }
            winit::event::WindowEvent::KeyboardInput { event, .. } => {
                if egui_wants_input {
                    return EventResponse {
                        repaint: egui_response.repaint,
                        exit: false,
                    };
                }
                if event.logical_key
                    == winit::keyboard::Key::Named(winit::keyboard::NamedKey::Escape)
                {
                    return EventResponse {
                        repaint: false,
                        exit: true,
                    };
                }
            }
            winit::event::WindowEvent::Resized(size) => {
                self.renderer.resize(*size);
            }
            winit::event::WindowEvent::MouseInput { state, button, .. } => {
                // Don't handle mouse input if egui wants the pointer
                if self.egui_wants_pointer {
                    return EventResponse {
                        repaint: egui_response.repaint,
                        exit: false,
                    };
                }
                let is_pressed = *state == winit::event::ElementState::Pressed;
                self.camera_controller.on_mouse_button(*button, is_pressed);
            }
            winit::event::WindowEvent::ModifiersChanged(modifiers) => {
                let shift = modifiers.state().shift_key();
                let alt = modifiers.state().alt_key();
                let control = modifiers.state().control_key();
                self.camera_controller.on_modifiers(shift, alt, control);
            }
            winit::event::WindowEvent::CursorMoved { position, .. } => {
                // Don't handle mouse movement if egui wants the pointer
                if self.egui_wants_pointer {
                    return EventResponse {
                        repaint: egui_response.repaint,
                        exit: false,
                    };
                }
                self.camera_controller
                    .on_mouse_move((position.x, position.y));
            }
            winit::event::WindowEvent::MouseWheel { delta, .. } => {
                // Don't handle mouse wheel if egui wants the pointer
                if self.egui_wants_pointer {
                    return EventResponse {
                        repaint: egui_response.repaint,
                        exit: false,
                    };
                }
                match delta {
                    winit::event::MouseScrollDelta::LineDelta(_, y) => {
                        // Real mouse wheel - simple zoom
                        self.camera_controller.simple_zoom(*y);
                    }
                    winit::event::MouseScrollDelta::PixelDelta(pos) => {
                        // Trackpad scroll (two fingers) - handle like PanGesture
                        let control = self.camera_controller.is_control_pressed();
                        let shift = self.camera_controller.is_shift_pressed();
                        self.camera_controller.on_pan_gesture(
                            pos.x as f32 * 0.05,
                            -pos.y as f32 * 0.05,
                            control,
                            shift,
                        );
                    }
                }
            }
            winit::event::WindowEvent::PanGesture { delta, phase, .. } => {
                // Don't handle pan gesture if egui wants the pointer
                if self.egui_wants_pointer {
                    return EventResponse {
                        repaint: egui_response.repaint,
                        exit: false,
                    };
                }
                use winit::event::TouchPhase;
                if matches!(phase, TouchPhase::Moved) {
                    let control = self.camera_controller.is_control_pressed();
                    let shift = self.camera_controller.is_shift_pressed();
                    self.camera_controller
                        .on_pan_gesture(delta.x, -delta.y, control, shift);
                }
            }
            _ => {}
        }

        EventResponse {
            repaint: false,
            exit: false,
        }
    }

    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        // Advance playback and pose the rig for the current record
        let rate = self.settings.playback.fps * self.settings.playback.speed;
        self.player.update(dt, rate);

        let mut ball_detected = false;
        if let Some(record) = self.recording.get(self.player.cursor()) {
            ball_detected = !record.ball_missing();
            self.rig.apply(record);
        }

        let raw_input = self.egui_state.take_egui_input(&self.window);
        let egui_ctx = self.renderer.egui_context();

        // Camera orientation for the axis gizmo
        let (camera_yaw, camera_pitch) = self.camera_controller.state().get_orientation();
        let capture_path = self.capture_path.clone();

        let mut actions = UiActions::default();
        let full_output = egui_ctx.run(raw_input, |ctx| {
            actions = self.ui.show(
                ctx,
                &mut self.player,
                &mut self.settings,
                &capture_path,
                camera_yaw,
                camera_pitch,
            );
        });

        // Update egui pointer state for next frame
        self.egui_wants_pointer = egui_ctx.wants_pointer_input();

        if actions.reset_camera {
            self.camera_controller.reset();
        }

        if actions.colors_changed {
            self.renderer.update_colors(&self.settings);
        }

        if actions.ball_interpolation_changed {
            if self.settings.playback.interpolate_ball {
                let filled = self.recording.interpolate_ball_gaps();
                log::info!("interpolated ball position on {filled} records");
            } else {
                // Undo by re-reading the raw capture
                self.reload_capture();
            }
        }

        if actions.reload_capture {
            self.reload_capture();
        }

        self.egui_state
            .handle_platform_output(&self.window, full_output.platform_output);

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);

        let screen_descriptor = ScreenDescriptor {
            size_in_pixels: [
                self.window.inner_size().width,
                self.window.inner_size().height,
            ],
            pixels_per_point: self.window.scale_factor() as f32,
        };

        // Sync camera state to the renderer, then rebuild the camera-facing
        // pose geometry against the final eye position
        self.renderer.camera = self.camera_controller.state().clone();
        self.renderer.update_pose(&self.rig, ball_detected);

        self.renderer.render(
            self.settings.display.show_skeleton,
            self.settings.display.show_grid,
            self.settings.display.show_ball,
            self.settings.display.far_plane,
            paint_jobs,
            full_output.textures_delta,
            screen_descriptor,
        )
    }

    /// Re-reads the capture from disk. Load failures keep the current
    /// recording so a mid-session reload cannot take the viewer down.
    fn reload_capture(&mut self) {
        match Recording::load(&self.capture_path) {
            Ok(mut recording) => {
                if self.settings.playback.interpolate_ball {
                    let filled = recording.interpolate_ball_gaps();
                    if filled > 0 {
                        log::info!("interpolated ball position on {filled} records");
                    }
                }

                self.player = Player::new(recording.len());
                self.player.set_looping(self.settings.playback.loop_enabled);

                if let Some((min, max)) = recording.bounds() {
                    self.camera_controller.frame(min, max);
                }

                self.recording = recording;
                if let Some(record) = self.recording.get(0) {
                    self.rig.apply(record);
                }
            }
            Err(err) => {
                log::error!("capture reload failed ({} error): {err}", err.class());
            }
        }
    }
}
