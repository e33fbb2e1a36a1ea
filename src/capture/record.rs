use nalgebra_glm::Vec3;

use crate::error::{PoseError, Result};

/// Joints per record.
pub const JOINT_COUNT: usize = 33;
/// Value offset of the ball's x coordinate, right after the joint block.
pub const BALL_OFFSET: usize = JOINT_COUNT * 3;
/// Values a record must carry: 33 joints plus the ball, three coordinates each.
pub const RECORD_VALUES: usize = BALL_OFFSET + 3;

/// One captured frame: a position for every joint, plus the tracked ball.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub joints: [Vec3; JOINT_COUNT],
    pub ball: Vec3,
}

impl Record {
    /// Parses one comma-separated record. `line` is the 1-based source line,
    /// carried into errors for reporting.
    ///
    /// The first `RECORD_VALUES` values are consumed; trailing extras are
    /// ignored. A record that is short or holds a non-numeric token is
    /// rejected whole, nothing is applied partially.
    pub fn parse(text: &str, line: usize) -> Result<Record> {
        let mut values = [0.0f32; RECORD_VALUES];
        let mut found = 0;

        for (column, token) in text.split(',').enumerate() {
            if found == RECORD_VALUES {
                break;
            }
            let token = token.trim();
            values[column] = token.parse().map_err(|_| PoseError::InvalidValue {
                line,
                column,
                token: token.to_string(),
            })?;
            found += 1;
        }

        if found < RECORD_VALUES {
            return Err(PoseError::RecordTooShort {
                line,
                expected: RECORD_VALUES,
                found,
            });
        }

        let mut joints = [Vec3::zeros(); JOINT_COUNT];
        for (i, joint) in joints.iter_mut().enumerate() {
            let at = i * 3;
            *joint = nalgebra_glm::vec3(values[at], values[at + 1], values[at + 2]);
        }
        let ball = nalgebra_glm::vec3(
            values[BALL_OFFSET],
            values[BALL_OFFSET + 1],
            values[BALL_OFFSET + 2],
        );

        Ok(Record { joints, ball })
    }

    /// The capture writes an all-zero ball on frames where the tracker lost it.
    pub fn ball_missing(&self) -> bool {
        self.ball == Vec3::zeros()
    }
}
