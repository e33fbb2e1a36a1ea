// The joint rig the capture drives: a flat set of joint slots plus the ball,
// under one root transform.

mod skeleton;

pub use skeleton::*;

use nalgebra_glm::Vec3;

use crate::capture::{JOINT_COUNT, Landmark, Record};
use crate::error::{PoseError, Result};

/// Rig construction parameters, validated before anything is built.
#[derive(Debug, Clone)]
pub struct RigConfig {
    pub joint_count: usize,
    /// Uniform scale applied to every local position.
    pub scale: f32,
    /// World-space offset of the rig root.
    pub offset: [f32; 3],
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            joint_count: JOINT_COUNT,
            scale: 1.0,
            offset: [0.0; 3],
        }
    }
}

/// Joint slots the player writes into. Local positions come straight from the
/// current record; world positions are derived through the root transform and
/// are what the renderer reads.
#[derive(Debug)]
pub struct Rig {
    config: RigConfig,
    offset: Vec3,
    locals: Vec<Vec3>,
    worlds: Vec<Vec3>,
    ball_local: Vec3,
    ball_world: Vec3,
}

impl Rig {
    pub fn new(config: RigConfig) -> Result<Rig> {
        if !config.scale.is_finite() || config.scale == 0.0 {
            return Err(PoseError::InvalidScale {
                value: config.scale,
            });
        }
        validate_edges(config.joint_count)?;

        let offset = Vec3::from(config.offset);
        let locals = vec![Vec3::zeros(); config.joint_count];
        let worlds = vec![offset; config.joint_count];
        Ok(Rig {
            config,
            offset,
            locals,
            worlds,
            ball_local: Vec3::zeros(),
            ball_world: offset,
        })
    }

    /// Writes the record into the rig: every joint slot and the ball, then
    /// the derived world positions. Records are pre-validated, so a pose is
    /// always applied whole.
    pub fn apply(&mut self, record: &Record) {
        let n = self.locals.len().min(JOINT_COUNT);
        self.locals[..n].copy_from_slice(&record.joints[..n]);
        self.ball_local = record.ball;
        self.refresh_world();
    }

    fn refresh_world(&mut self) {
        let scale = self.config.scale;
        for (world, local) in self.worlds.iter_mut().zip(&self.locals) {
            *world = self.offset + local * scale;
        }
        self.ball_world = self.offset + self.ball_local * scale;
    }

    pub fn joint_world(&self, landmark: Landmark) -> Vec3 {
        self.worlds[landmark.index()]
    }

    pub fn ball_world(&self) -> Vec3 {
        self.ball_world
    }

    pub fn joint_count(&self) -> usize {
        self.locals.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::RECORD_VALUES;
    use crate::error::ErrorClass;

    fn counting_record() -> Record {
        let line = (1..=RECORD_VALUES)
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(",");
        Record::parse(&line, 1).unwrap()
    }

    #[test]
    fn default_config_builds_a_full_rig() {
        let rig = Rig::new(RigConfig::default()).unwrap();
        assert_eq!(rig.joint_count(), JOINT_COUNT);
    }

    #[test]
    fn short_rig_is_rejected_at_construction() {
        let config = RigConfig {
            joint_count: 20,
            ..RigConfig::default()
        };
        let err = Rig::new(config).unwrap_err();
        assert_eq!(err.class(), ErrorClass::Config);
    }

    #[test]
    fn degenerate_scale_is_rejected() {
        for scale in [0.0, f32::NAN, f32::INFINITY] {
            let config = RigConfig {
                scale,
                ..RigConfig::default()
            };
            let err = Rig::new(config).unwrap_err();
            assert_eq!(err.class(), ErrorClass::Config);
        }
    }

    #[test]
    fn apply_writes_every_joint_and_the_ball() {
        let mut rig = Rig::new(RigConfig::default()).unwrap();
        rig.apply(&counting_record());

        assert_eq!(
            rig.joint_world(Landmark::Nose),
            nalgebra_glm::vec3(1.0, 2.0, 3.0)
        );
        assert_eq!(
            rig.joint_world(Landmark::LeftEyeInner),
            nalgebra_glm::vec3(4.0, 5.0, 6.0)
        );
        assert_eq!(
            rig.joint_world(Landmark::RightFootIndex),
            nalgebra_glm::vec3(97.0, 98.0, 99.0)
        );
        assert_eq!(rig.ball_world(), nalgebra_glm::vec3(100.0, 101.0, 102.0));
    }

    #[test]
    fn world_positions_go_through_the_root_transform() {
        let config = RigConfig {
            scale: 2.0,
            offset: [1.0, 2.0, 3.0],
            ..RigConfig::default()
        };
        let mut rig = Rig::new(config).unwrap();
        rig.apply(&counting_record());

        // local (1,2,3) * 2 + (1,2,3)
        assert_eq!(
            rig.joint_world(Landmark::Nose),
            nalgebra_glm::vec3(3.0, 6.0, 9.0)
        );
        assert_eq!(rig.ball_world(), nalgebra_glm::vec3(201.0, 204.0, 207.0));
    }

    #[test]
    fn a_new_pose_replaces_the_previous_one() {
        let mut rig = Rig::new(RigConfig::default()).unwrap();
        rig.apply(&counting_record());

        let zero_line = vec!["0"; RECORD_VALUES].join(",");
        rig.apply(&Record::parse(&zero_line, 1).unwrap());

        for landmark in Landmark::ALL {
            assert_eq!(rig.joint_world(landmark), Vec3::zeros());
        }
        assert_eq!(rig.ball_world(), Vec3::zeros());
    }
}
