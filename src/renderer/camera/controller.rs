use super::CameraState;

/// Handles camera input and transformations
pub struct CameraController {
    state: CameraState,
    left_mouse_pressed: bool,
    middle_mouse_pressed: bool,
    right_mouse_pressed: bool,
    alt_pressed: bool,
    shift_pressed: bool,
    control_pressed: bool,
    last_mouse_pos: Option<(f64, f64)>,
}

impl CameraController {
    pub fn new(state: CameraState) -> Self {
        Self {
            state,
            left_mouse_pressed: false,
            middle_mouse_pressed: false,
            right_mouse_pressed: false,
            alt_pressed: false,
            shift_pressed: false,
            control_pressed: false,
            last_mouse_pos: None,
        }
    }

    pub fn state(&self) -> &CameraState {
        &self.state
    }

    pub fn is_shift_pressed(&self) -> bool {
        self.shift_pressed
    }

    pub fn is_control_pressed(&self) -> bool {
        self.control_pressed
    }

    /// Re-center the orbit on a bounding box. Becomes the new reset pose.
    pub fn frame(&mut self, min: [f32; 3], max: [f32; 3]) {
        self.state.frame(min, max);
    }

    /// Handle mouse button press/release
    pub fn on_mouse_button(&mut self, button: winit::event::MouseButton, pressed: bool) {
        match button {
            winit::event::MouseButton::Left => {
                self.left_mouse_pressed = pressed;
                if !pressed {
                    self.last_mouse_pos = None;
                }
            }
            winit::event::MouseButton::Middle => {
                self.middle_mouse_pressed = pressed;
                if !pressed {
                    self.last_mouse_pos = None;
                }
            }
            winit::event::MouseButton::Right => {
                self.right_mouse_pressed = pressed;
                if !pressed {
                    self.last_mouse_pos = None;
                }
            }
            _ => {}
        }
    }

    /// Handle modifier keys (Shift, Alt, Control)
    pub fn on_modifiers(&mut self, shift: bool, alt: bool, control: bool) {
        self.shift_pressed = shift;
        self.alt_pressed = alt;
        self.control_pressed = control;
    }

    /// Handle mouse movement with camera transformations
    pub fn on_mouse_move(&mut self, position: (f64, f64)) -> bool {
        let should_pan =
            self.middle_mouse_pressed || (self.shift_pressed && self.right_mouse_pressed);
        let should_rotate =
            self.right_mouse_pressed || (self.alt_pressed && self.left_mouse_pressed);

        let mut handled = false;

        if should_pan {
            if let Some(last_pos) = self.last_mouse_pos {
                let delta_x = position.0 - last_pos.0;
                let delta_y = position.1 - last_pos.1;
                self.pan(delta_x as f32, -delta_y as f32);
                handled = true;
            }
            self.last_mouse_pos = Some(position);
        } else if should_rotate {
            if let Some(last_pos) = self.last_mouse_pos {
                let delta_x = position.0 - last_pos.0;
                let delta_y = position.1 - last_pos.1;
                self.rotate(delta_x as f32, delta_y as f32);
                handled = true;
            }
            self.last_mouse_pos = Some(position);
        } else {
            self.last_mouse_pos = None;
        }

        handled
    }

    /// Rotate camera around target
    fn rotate(&mut self, delta_x: f32, delta_y: f32) {
        self.state.yaw -= delta_x * 0.01; // Inverted for natural rotation
        self.state.pitch -= delta_y * 0.01; // Inverted vertical axis
        self.state.pitch = self.state.pitch.clamp(-1.5, 1.5);
    }

    /// Pan camera (move target)
    fn pan(&mut self, delta_x: f32, delta_y: f32) {
        // Camera basis from the eye toward the target, Y up
        let forward = nalgebra_glm::vec3(
            -self.state.pitch.cos() * self.state.yaw.cos(),
            -self.state.pitch.sin(),
            -self.state.pitch.cos() * self.state.yaw.sin(),
        );
        let right = nalgebra_glm::normalize(&nalgebra_glm::cross(
            &forward,
            &nalgebra_glm::vec3(0.0, 1.0, 0.0),
        ));
        let up = nalgebra_glm::cross(&right, &forward);

        // Pan speed based on distance
        let pan_speed = self.state.distance * 0.001;

        // Move target (inverted vertical axis)
        self.state.target[0] += right.x * delta_x * pan_speed - up.x * delta_y * pan_speed;
        self.state.target[1] += right.y * delta_x * pan_speed - up.y * delta_y * pan_speed;
        self.state.target[2] += right.z * delta_x * pan_speed - up.z * delta_y * pan_speed;
    }

    /// Two-finger pan gesture (trackpad)
    pub fn on_pan_gesture(&mut self, delta_x: f32, delta_y: f32, control: bool, shift: bool) {
        if control {
            // Control + pan = zoom from viewport center
            self.simple_zoom(-delta_y * 0.5);
        } else if shift {
            // Shift + pan = pan (move viewport center / target)
            self.pan(delta_x, delta_y);
        } else {
            // Just pan = rotate around target
            self.rotate(delta_x, delta_y);
        }
    }

    /// Simple zoom - just change distance
    pub fn simple_zoom(&mut self, delta: f32) {
        let zoom_factor = 1.0 - delta * 0.1;
        self.state.distance = (self.state.distance * zoom_factor).clamp(0.5, 200.0);
    }

    /// Reset camera to defaults
    pub fn reset(&mut self) {
        self.state.reset();
        self.last_mouse_pos = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_without_buttons_does_nothing() {
        let mut controller = CameraController::new(CameraState::default());
        let before = controller.state().clone();

        assert!(!controller.on_mouse_move((10.0, 10.0)));
        assert!(!controller.on_mouse_move((200.0, 50.0)));

        assert_eq!(controller.state().yaw, before.yaw);
        assert_eq!(controller.state().pitch, before.pitch);
        assert_eq!(controller.state().target, before.target);
    }

    #[test]
    fn right_drag_rotates_and_clamps_pitch() {
        let mut controller = CameraController::new(CameraState::default());
        controller.on_mouse_button(winit::event::MouseButton::Right, true);

        controller.on_mouse_move((0.0, 0.0));
        assert!(controller.on_mouse_move((10.0, -1000.0)));
        assert!(controller.state().pitch <= 1.5);

        controller.on_mouse_move((10.0, 10_000.0));
        assert!(controller.state().pitch >= -1.5);
    }

    #[test]
    fn middle_drag_pans_the_target() {
        let mut controller = CameraController::new(CameraState::default());
        controller.on_mouse_button(winit::event::MouseButton::Middle, true);

        controller.on_mouse_move((0.0, 0.0));
        controller.on_mouse_move((40.0, 0.0));

        assert_ne!(controller.state().target, CameraState::default().target);
    }

    #[test]
    fn pan_keeps_the_target_height_when_level() {
        let mut controller = CameraController::new(CameraState::new(0.7, 0.0, 5.0, [0.0; 3]));
        controller.on_mouse_button(winit::event::MouseButton::Middle, true);

        controller.on_mouse_move((0.0, 0.0));
        controller.on_mouse_move((30.0, 0.0));

        // Horizontal drag at zero pitch slides along the ground plane
        assert_eq!(controller.state().target[1], 0.0);
    }

    #[test]
    fn zoom_clamps_the_distance() {
        let mut controller = CameraController::new(CameraState::default());

        for _ in 0..200 {
            controller.simple_zoom(1.0);
        }
        assert!(controller.state().distance >= 0.5);

        for _ in 0..200 {
            controller.simple_zoom(-1.0);
        }
        assert!(controller.state().distance <= 200.0);
    }

    #[test]
    fn reset_restores_framed_defaults() {
        let mut controller = CameraController::new(CameraState::default());
        controller.frame([-1.0, 0.0, -1.0], [1.0, 2.0, 1.0]);
        let framed_target = controller.state().target;
        let framed_distance = controller.state().distance;

        controller.on_mouse_button(winit::event::MouseButton::Middle, true);
        controller.on_mouse_move((0.0, 0.0));
        controller.on_mouse_move((80.0, 40.0));
        controller.simple_zoom(3.0);
        controller.reset();

        assert_eq!(controller.state().target, framed_target);
        assert_eq!(controller.state().distance, framed_distance);
    }
}
