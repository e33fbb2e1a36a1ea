use crate::playback::Player;
use crate::settings::{MAX_RATE, MAX_SPEED, MIN_RATE, MIN_SPEED, Settings};

/// What the app has to act on after the UI pass.
#[derive(Default)]
pub struct UiActions {
    pub reset_camera: bool,
    pub colors_changed: bool,
    pub reload_capture: bool,
    pub ball_interpolation_changed: bool,
}

pub struct Ui;

impl Ui {
    pub fn new() -> Self {
        Self
    }

    pub fn show(
        &mut self,
        ctx: &egui::Context,
        player: &mut Player,
        settings: &mut Settings,
        capture_name: &str,
        camera_yaw: f32,
        camera_pitch: f32,
    ) -> UiActions {
        let mut actions = UiActions::default();

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                if ui.button("🔄 Reload Capture").clicked() {
                    actions.reload_capture = true;
                }

                ui.separator();
                ui.label("📋 Windows:");

                if ui
                    .button(if settings.ui.show_playback {
                        "✅ Playback"
                    } else {
                        "⬜ Playback"
                    })
                    .clicked()
                {
                    settings.ui.show_playback = !settings.ui.show_playback;
                    settings.ui.save();
                }

                if ui
                    .button(if settings.ui.show_display_settings {
                        "✅ Display"
                    } else {
                        "⬜ Display"
                    })
                    .clicked()
                {
                    settings.ui.show_display_settings = !settings.ui.show_display_settings;
                    settings.ui.save();
                }

                if ui
                    .button(if settings.ui.show_colors {
                        "✅ Colors"
                    } else {
                        "⬜ Colors"
                    })
                    .clicked()
                {
                    settings.ui.show_colors = !settings.ui.show_colors;
                    settings.ui.save();
                }
            });
        });

        // Show windows based on UI settings
        if settings.ui.show_playback {
            actions.ball_interpolation_changed =
                self.show_playback_window(ctx, player, settings, capture_name);
        }

        if settings.ui.show_display_settings {
            actions.reset_camera = self.show_display_settings_window(ctx, settings);
        }

        if settings.ui.show_colors {
            actions.colors_changed = self.show_colors_window(ctx, settings);
        }

        self.draw_axis_gizmo(ctx, camera_yaw, camera_pitch);

        actions
    }

    /// Returns true when the ball interpolation toggle changed.
    fn show_playback_window(
        &mut self,
        ctx: &egui::Context,
        player: &mut Player,
        settings: &mut Settings,
        capture_name: &str,
    ) -> bool {
        let mut interpolation_changed = false;

        egui::Window::new("🎬 Playback")
            .default_width(350.0)
            .resizable(true)
            .open(&mut settings.ui.show_playback)
            .show(ctx, |ui| {
                if player.record_count() == 0 {
                    ui.label("No records loaded");
                    return;
                }

                ui.horizontal(|ui| {
                    // Control buttons
                    ui.add_enabled_ui(!player.is_playing(), |ui| {
                        if ui.button("▶ Play").clicked() {
                            player.play();
                        }
                    });

                    ui.add_enabled_ui(player.is_playing(), |ui| {
                        if ui.button("⏸ Pause").clicked() {
                            player.pause();
                        }
                    });

                    let can_stop = player.is_playing() || player.cursor() > 0;
                    ui.add_enabled_ui(can_stop, |ui| {
                        if ui.button("⏹ Stop").clicked() {
                            player.stop();
                        }
                    });

                    ui.separator();

                    let loop_button = if player.is_looping() {
                        "🔁 Loop"
                    } else {
                        "➡ Once"
                    };
                    if ui.button(loop_button).clicked() {
                        player.toggle_looping();
                        settings.playback.loop_enabled = player.is_looping();
                        settings.playback.save();
                    }
                });

                ui.separator();

                ui.label(format!("Capture: {capture_name}"));
                ui.label(format!(
                    "Records: {} ({:.1}s at {:.0} fps)",
                    player.record_count(),
                    player.record_count() as f32 / settings.playback.fps,
                    settings.playback.fps
                ));

                let state_text = if player.is_playing() {
                    format!("▶ Playing - Record {}", player.cursor() + 1)
                } else {
                    format!("⏸ Paused - Record {}", player.cursor() + 1)
                };
                ui.label(egui::RichText::new(state_text).strong());

                ui.separator();

                // Record slider
                ui.horizontal(|ui| {
                    ui.label("Record:");
                    let mut record = player.cursor() as f32 + 1.0;
                    let record_range = 1.0..=player.record_count() as f32;
                    let slider_response =
                        ui.add(egui::Slider::new(&mut record, record_range).integer());

                    // Only react to actual user interaction, not playback advancing
                    if slider_response.drag_started() {
                        player.pause();
                    }
                    if slider_response.changed() {
                        player.seek(record as usize - 1);
                    }
                });

                let mut changed = false;

                ui.horizontal(|ui| {
                    ui.label("Rate:");
                    changed |= ui
                        .add(
                            egui::Slider::new(&mut settings.playback.fps, MIN_RATE..=MAX_RATE)
                                .suffix(" fps"),
                        )
                        .changed();
                });

                ui.horizontal(|ui| {
                    ui.label("Speed:");
                    changed |= ui
                        .add(
                            egui::Slider::new(&mut settings.playback.speed, MIN_SPEED..=MAX_SPEED)
                                .suffix("×")
                                .logarithmic(true),
                        )
                        .changed();
                });

                ui.separator();

                if ui
                    .checkbox(
                        &mut settings.playback.interpolate_ball,
                        "Interpolate ball gaps",
                    )
                    .changed()
                {
                    interpolation_changed = true;
                    changed = true;
                }

                if changed {
                    settings.playback.save();
                }
            });

        if !settings.ui.show_playback {
            settings.ui.save();
        }

        interpolation_changed
    }

    fn show_display_settings_window(
        &mut self,
        ctx: &egui::Context,
        settings: &mut Settings,
    ) -> bool {
        let mut reset_camera = false;

        egui::Window::new("🎨 Display Settings")
            .default_width(300.0)
            .resizable(true)
            .open(&mut settings.ui.show_display_settings)
            .show(ctx, |ui| {
                let mut changed = false;

                changed |= ui
                    .checkbox(&mut settings.display.show_skeleton, "Show Skeleton")
                    .changed();
                changed |= ui
                    .checkbox(&mut settings.display.show_grid, "Show Grid")
                    .changed();
                changed |= ui
                    .checkbox(&mut settings.display.show_ball, "Show Ball")
                    .changed();

                ui.separator();
                ui.label(format!(
                    "Segment width: {} units",
                    crate::renderer::SEGMENT_WIDTH
                ));

                ui.separator();
                ui.label("Far Plane (View Distance):");
                changed |= ui
                    .add(
                        egui::Slider::new(&mut settings.display.far_plane, 10.0..=2000.0)
                            .suffix(" units")
                            .logarithmic(true),
                    )
                    .changed();

                if changed {
                    settings.display.save();
                }

                ui.separator();

                if ui.button("Reset Camera").clicked() {
                    reset_camera = true;
                }
            });

        if !settings.ui.show_display_settings {
            settings.ui.save();
        }

        reset_camera
    }

    fn show_colors_window(&mut self, ctx: &egui::Context, settings: &mut Settings) -> bool {
        let mut colors_changed = false;

        egui::Window::new("🌈 Colors")
            .default_width(300.0)
            .resizable(true)
            .open(&mut settings.ui.show_colors)
            .show(ctx, |ui| {
                let mut changed = false;

                ui.label("Background:");
                changed |= ui
                    .color_edit_button_rgb(&mut settings.colors.background_color)
                    .changed();

                ui.label("Skeleton Segments:");
                changed |= ui
                    .color_edit_button_rgb(&mut settings.colors.segment_color)
                    .changed();

                ui.label("Ball Marker:");
                changed |= ui
                    .color_edit_button_rgb(&mut settings.colors.ball_color)
                    .changed();

                ui.label("Grid Major Lines:");
                changed |= ui
                    .color_edit_button_rgb(&mut settings.colors.grid_major_color)
                    .changed();

                ui.label("Grid Minor Lines:");
                changed |= ui
                    .color_edit_button_rgb(&mut settings.colors.grid_minor_color)
                    .changed();

                ui.separator();

                if ui.button("Reset to Defaults").clicked() {
                    settings.colors = crate::settings::ColorSettings::default();
                    changed = true;
                }

                if changed {
                    settings.colors.save();
                    colors_changed = true;
                }
            });

        if !settings.ui.show_colors {
            settings.ui.save();
        }

        colors_changed
    }

    /// Blender-style orientation gizmo in the bottom-right corner.
    fn draw_axis_gizmo(&self, ctx: &egui::Context, camera_yaw: f32, camera_pitch: f32) {
        let gizmo_size = 100.0;
        let gizmo_margin = 20.0;

        let screen_rect = ctx.viewport_rect();
        let gizmo_x = screen_rect.max.x - gizmo_size - gizmo_margin;
        let gizmo_y = screen_rect.max.y - gizmo_size - gizmo_margin;
        let center = egui::pos2(gizmo_x + gizmo_size / 2.0, gizmo_y + gizmo_size / 2.0);
        let radius = gizmo_size / 2.8;
        let circle_radius = 11.0; // Radius of circles at axis ends

        // Project the world axes with the same Y-up orbit the camera uses.
        // Screen y grows downward, so vertical components are negated.
        let (sin_yaw, cos_yaw) = camera_yaw.sin_cos();
        let (sin_pitch, cos_pitch) = camera_pitch.sin_cos();

        let x_end = center + egui::vec2(sin_yaw, sin_pitch * cos_yaw) * radius;
        let y_end = center + egui::vec2(0.0, -cos_pitch) * radius;
        let z_end = center + egui::vec2(-cos_yaw, sin_pitch * sin_yaw) * radius;

        let x_depth = cos_pitch * cos_yaw;
        let y_depth = sin_pitch;
        let z_depth = cos_pitch * sin_yaw;

        let painter = ctx.layer_painter(egui::LayerId::new(
            egui::Order::Foreground,
            egui::Id::new("axis_gizmo_painter"),
        ));
        let font_id = egui::FontId::proportional(14.0);

        painter.circle_filled(
            center,
            gizmo_size / 2.0,
            egui::Color32::from_rgba_premultiplied(40, 40, 42, 220),
        );
        painter.circle_stroke(
            center,
            gizmo_size / 2.0,
            egui::Stroke::new(1.5, egui::Color32::from_gray(70)),
        );

        let x_color = egui::Color32::from_rgb(220, 38, 38); // Bright red
        let y_color = egui::Color32::from_rgb(102, 204, 102); // Bright green
        let z_color = egui::Color32::from_rgb(64, 128, 255); // Bright blue

        // Sort and draw axes (back to front)
        let mut axes = vec![
            (x_depth, x_color, x_end, "X"),
            (y_depth, y_color, y_end, "Y"),
            (z_depth, z_color, z_end, "Z"),
        ];
        axes.sort_by(|a, b| a.0.total_cmp(&b.0));

        for (depth, color, end, label) in axes {
            if depth > 0.0 {
                // Front-facing axis - bright and bold
                painter.line_segment([center, end], egui::Stroke::new(3.5, color));
                painter.circle_filled(end, circle_radius, color);
                painter.text(
                    end,
                    egui::Align2::CENTER_CENTER,
                    label,
                    font_id.clone(),
                    egui::Color32::WHITE,
                );
            } else {
                // Back-facing axis - darker and thinner
                let darker = egui::Color32::from_rgba_premultiplied(
                    (color.r() as f32 * 0.4) as u8,
                    (color.g() as f32 * 0.4) as u8,
                    (color.b() as f32 * 0.4) as u8,
                    180,
                );
                painter.line_segment([center, end], egui::Stroke::new(2.0, darker));
                painter.circle_filled(end, circle_radius * 0.7, darker);
            }
        }
    }
}

impl Default for Ui {
    fn default() -> Self {
        Self::new()
    }
}
