use crate::CONFY_APP_NAME;
use crate::playback::DEFAULT_RATE;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplaySettings {
    pub show_skeleton: bool,
    pub show_grid: bool,
    pub show_ball: bool,
    pub far_plane: f32,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            show_skeleton: true,
            show_grid: true,
            show_ball: true,
            far_plane: 500.0,
        }
    }
}

impl DisplaySettings {
    pub fn load() -> Self {
        confy::load(CONFY_APP_NAME, "display").unwrap_or_default()
    }

    pub fn save(&self) {
        let _ = confy::store(CONFY_APP_NAME, "display", self);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorSettings {
    pub background_color: [f32; 3],
    pub grid_major_color: [f32; 3],
    pub grid_minor_color: [f32; 3],
    pub segment_color: [f32; 3],
    pub ball_color: [f32; 3],
}

impl Default for ColorSettings {
    fn default() -> Self {
        Self {
            background_color: [0.15, 0.15, 0.18],
            grid_major_color: [0.2, 0.2, 0.2],
            grid_minor_color: [0.4, 0.4, 0.4],
            segment_color: [1.0, 0.5, 0.0],
            ball_color: [1.0, 1.0, 0.0],
        }
    }
}

impl ColorSettings {
    pub fn load() -> Self {
        confy::load(CONFY_APP_NAME, "colors").unwrap_or_default()
    }

    pub fn save(&self) {
        let _ = confy::store(CONFY_APP_NAME, "colors", self);
    }
}

/// Replay rate bounds shared by the rate slider and the load-time clamp.
pub const MIN_RATE: f32 = 1.0;
pub const MAX_RATE: f32 = 120.0;

/// Speed multiplier bounds.
pub const MIN_SPEED: f32 = 0.25;
pub const MAX_SPEED: f32 = 4.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackSettings {
    /// Replay rate in records per second.
    pub fps: f32,
    /// Speed multiplier applied on top of `fps`.
    pub speed: f32,
    pub loop_enabled: bool,
    /// Fill undetected ball frames by interpolating between detections.
    pub interpolate_ball: bool,
    /// Capture file used when no path is given on the command line.
    pub capture_path: String,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            fps: DEFAULT_RATE,
            speed: 1.0,
            loop_enabled: true,
            interpolate_ball: false,
            capture_path: "AnimationFile.txt".to_string(),
        }
    }
}

impl PlaybackSettings {
    pub fn load() -> Self {
        let mut settings: Self = confy::load(CONFY_APP_NAME, "playback").unwrap_or_default();
        settings.sanitize();
        settings
    }

    pub fn save(&self) {
        let _ = confy::store(CONFY_APP_NAME, "playback", self);
    }

    /// Rates in a hand-edited config file can be anything TOML accepts,
    /// `inf` included; pull them back into the ranges the sliders offer.
    fn sanitize(&mut self) {
        let defaults = Self::default();
        self.fps = if self.fps.is_finite() {
            self.fps.clamp(MIN_RATE, MAX_RATE)
        } else {
            defaults.fps
        };
        self.speed = if self.speed.is_finite() {
            self.speed.clamp(MIN_SPEED, MAX_SPEED)
        } else {
            defaults.speed
        };
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiSettings {
    pub show_playback: bool,
    pub show_display_settings: bool,
    pub show_colors: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            show_playback: true,
            show_display_settings: false,
            show_colors: false,
        }
    }
}

impl UiSettings {
    pub fn load() -> Self {
        confy::load(CONFY_APP_NAME, "ui").unwrap_or_default()
    }

    pub fn save(&self) {
        let _ = confy::store(CONFY_APP_NAME, "ui", self);
    }
}

// Aggregate struct for convenience
pub struct Settings {
    pub display: DisplaySettings,
    pub colors: ColorSettings,
    pub playback: PlaybackSettings,
    pub ui: UiSettings,
}

impl Settings {
    pub fn load() -> Self {
        Self {
            display: DisplaySettings::load(),
            colors: ColorSettings::load(),
            playback: PlaybackSettings::load(),
            ui: UiSettings::load(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playback_defaults_match_the_capture_rate() {
        let settings = PlaybackSettings::default();
        assert_eq!(settings.fps, DEFAULT_RATE);
        assert_eq!(settings.speed, 1.0);
        assert!(settings.loop_enabled);
        assert!(!settings.interpolate_ball);
    }

    #[test]
    fn hand_edited_rates_are_clamped_to_the_slider_ranges() {
        let mut settings = PlaybackSettings {
            fps: f32::INFINITY,
            speed: 9000.0,
            ..PlaybackSettings::default()
        };
        settings.sanitize();
        assert_eq!(settings.fps, DEFAULT_RATE);
        assert_eq!(settings.speed, MAX_SPEED);

        let mut settings = PlaybackSettings {
            fps: 0.0,
            speed: f32::NAN,
            ..PlaybackSettings::default()
        };
        settings.sanitize();
        assert_eq!(settings.fps, MIN_RATE);
        assert_eq!(settings.speed, 1.0);

        let mut settings = PlaybackSettings {
            fps: 60.0,
            speed: 2.0,
            ..PlaybackSettings::default()
        };
        settings.sanitize();
        assert_eq!(settings.fps, 60.0);
        assert_eq!(settings.speed, 2.0);
    }

    #[test]
    fn display_defaults_show_the_whole_scene() {
        let settings = DisplaySettings::default();
        assert!(settings.show_skeleton);
        assert!(settings.show_grid);
        assert!(settings.show_ball);
    }
}
