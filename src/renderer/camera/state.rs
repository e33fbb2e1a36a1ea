use nalgebra_glm::Vec3;

/// Orbit camera: yaw/pitch/distance around a target, Y up to match the
/// capture space (image rows map to +y).
#[derive(Debug, Clone)]
pub struct CameraState {
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    pub target: [f32; 3],
    pub default_yaw: f32,
    pub default_pitch: f32,
    pub default_distance: f32,
    pub default_target: [f32; 3],
}

impl CameraState {
    pub fn new(yaw: f32, pitch: f32, distance: f32, target: [f32; 3]) -> Self {
        Self {
            yaw,
            pitch,
            distance,
            target,
            default_yaw: yaw,
            default_pitch: pitch,
            default_distance: distance,
            default_target: target,
        }
    }

    pub fn reset(&mut self) {
        self.yaw = self.default_yaw;
        self.pitch = self.default_pitch;
        self.distance = self.default_distance;
        self.target = self.default_target;
    }

    pub fn get_orientation(&self) -> (f32, f32) {
        (self.yaw, self.pitch)
    }

    /// Eye position on the orbit sphere.
    pub fn eye(&self) -> Vec3 {
        let (yaw, pitch) = (self.yaw, self.pitch);
        Vec3::from(self.target)
            + self.distance
                * nalgebra_glm::vec3(
                    pitch.cos() * yaw.cos(),
                    pitch.sin(),
                    pitch.cos() * yaw.sin(),
                )
    }

    /// Centers the orbit on a bounding box and backs off far enough to see
    /// all of it. Also becomes the new reset pose.
    pub fn frame(&mut self, min: [f32; 3], max: [f32; 3]) {
        let center = [
            (min[0] + max[0]) / 2.0,
            (min[1] + max[1]) / 2.0,
            (min[2] + max[2]) / 2.0,
        ];
        let half_diagonal = nalgebra_glm::length(&nalgebra_glm::vec3(
            (max[0] - min[0]) / 2.0,
            (max[1] - min[1]) / 2.0,
            (max[2] - min[2]) / 2.0,
        ));
        let distance = (half_diagonal * 2.5).max(2.0);

        self.target = center;
        self.distance = distance;
        self.default_target = center;
        self.default_distance = distance;
    }
}

impl Default for CameraState {
    fn default() -> Self {
        // straight down +z at the capture plane, slightly above eye level
        Self::new(std::f32::consts::FRAC_PI_2, 0.2, 10.0, [0.0, 0.0, 0.0])
    }
}
