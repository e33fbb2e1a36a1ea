// Capture data: the text recording produced by the pose tracker and the
// per-frame records inside it.

mod landmark;
mod record;

pub use landmark::*;
pub use record::*;

use std::path::Path;

use crate::error::{PoseError, Result};

/// A full capture: every record of the source file, parsed eagerly so playback
/// never meets a malformed line.
#[derive(Debug, Clone, Default)]
pub struct Recording {
    pub records: Vec<Record>,
}

impl Recording {
    pub fn load(path: impl AsRef<Path>) -> Result<Recording> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| PoseError::CaptureRead {
            path: path.to_path_buf(),
            source,
        })?;
        let recording = Recording::from_text(&text)?;
        log::info!(
            "loaded capture '{}': {} records",
            path.display(),
            recording.len()
        );
        Ok(recording)
    }

    /// Parses every non-blank line. Line numbers in errors refer to the
    /// original text, blank lines included.
    pub fn from_text(text: &str) -> Result<Recording> {
        let mut records = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            records.push(Record::parse(line, idx + 1)?);
        }
        Ok(Recording { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    /// Min/max corner over every joint of every record, plus the ball where
    /// the tracker saw it. `None` for an empty recording.
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        if self.records.is_empty() {
            return None;
        }
        let mut min = [f32::INFINITY; 3];
        let mut max = [f32::NEG_INFINITY; 3];
        let mut grow = |p: [f32; 3]| {
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        };
        for record in &self.records {
            for joint in &record.joints {
                grow((*joint).into());
            }
            if !record.ball_missing() {
                grow(record.ball.into());
            }
        }
        Some((min, max))
    }

    /// Fills tracker dropouts: frames with an all-zero ball take a value
    /// linearly interpolated between the nearest detections, matching the
    /// repair the capture tooling applies offline. Frames before the first
    /// detection hold the first, frames after the last hold the last.
    /// Returns the number of records filled in.
    pub fn interpolate_ball_gaps(&mut self) -> usize {
        let known: Vec<usize> = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, r)| !r.ball_missing())
            .map(|(i, _)| i)
            .collect();
        if known.is_empty() {
            return 0;
        }

        let first = known[0];
        let last = known[known.len() - 1];
        let mut filled = 0;

        for i in 0..self.records.len() {
            if !self.records[i].ball_missing() {
                continue;
            }
            let ball = if i < first {
                self.records[first].ball
            } else if i > last {
                self.records[last].ball
            } else {
                let hi = known.partition_point(|&k| k < i);
                let (a, b) = (known[hi - 1], known[hi]);
                let t = (i - a) as f32 / (b - a) as f32;
                nalgebra_glm::lerp(&self.records[a].ball, &self.records[b].ball, t)
            };
            self.records[i].ball = ball;
            filled += 1;
        }
        filled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorClass;
    use nalgebra_glm::Vec3;

    fn counting_line() -> String {
        (1..=RECORD_VALUES)
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }

    fn record_with_ball(ball: Vec3) -> Record {
        Record {
            joints: [Vec3::zeros(); JOINT_COUNT],
            ball,
        }
    }

    fn missing_ball_record() -> Record {
        record_with_ball(Vec3::zeros())
    }

    #[test]
    fn from_text_parses_every_line_and_skips_blanks() {
        let line = counting_line();
        let text = format!("{line}\n\n{line}\n   \n{line}\n");
        let recording = Recording::from_text(&text).unwrap();
        assert_eq!(recording.len(), 3);
    }

    #[test]
    fn from_text_on_empty_input_is_an_empty_recording() {
        let recording = Recording::from_text("").unwrap();
        assert!(recording.is_empty());
        assert!(recording.bounds().is_none());
    }

    #[test]
    fn from_text_reports_the_failing_line_number() {
        let line = counting_line();
        let text = format!("{line}\n\n1,2,3\n");
        let err = Recording::from_text(&text).unwrap_err();
        match err {
            PoseError::RecordTooShort { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn load_round_trips_through_a_file() {
        let path = std::env::temp_dir().join(format!(
            "posevis-load-roundtrip-{}.txt",
            std::process::id()
        ));
        std::fs::write(&path, format!("{}\n{}\n", counting_line(), counting_line())).unwrap();

        let recording = Recording::load(&path).unwrap();
        assert_eq!(recording.len(), 2);
        assert_eq!(
            recording.get(0).unwrap().ball,
            nalgebra_glm::vec3(100.0, 101.0, 102.0)
        );

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn load_of_a_missing_file_is_a_config_error() {
        let path = std::env::temp_dir().join(format!(
            "posevis-no-such-capture-{}.txt",
            std::process::id()
        ));
        let err = Recording::load(&path).unwrap_err();
        assert_eq!(err.class(), ErrorClass::Config);
    }

    #[test]
    fn bounds_cover_joints_and_detected_ball() {
        let mut a = record_with_ball(nalgebra_glm::vec3(9.0, 1.0, 0.0));
        a.joints[0] = nalgebra_glm::vec3(-2.0, 0.5, 1.0);
        let mut b = missing_ball_record();
        b.joints[5] = nalgebra_glm::vec3(4.0, 7.0, -3.0);

        let recording = Recording {
            records: vec![a, b],
        };
        let (min, max) = recording.bounds().unwrap();
        assert_eq!(min, [-2.0, 0.0, -3.0]);
        assert_eq!(max, [9.0, 7.0, 1.0]);
    }

    #[test]
    fn interior_ball_gap_is_interpolated() {
        let mut recording = Recording {
            records: vec![
                record_with_ball(nalgebra_glm::vec3(0.0, 1.0, 0.0)),
                missing_ball_record(),
                missing_ball_record(),
                record_with_ball(nalgebra_glm::vec3(3.0, 1.0, 0.0)),
            ],
        };
        assert_eq!(recording.interpolate_ball_gaps(), 2);
        assert_eq!(recording.records[1].ball, nalgebra_glm::vec3(1.0, 1.0, 0.0));
        assert_eq!(recording.records[2].ball, nalgebra_glm::vec3(2.0, 1.0, 0.0));
    }

    #[test]
    fn leading_and_trailing_gaps_hold_the_nearest_detection() {
        let mut recording = Recording {
            records: vec![
                missing_ball_record(),
                record_with_ball(nalgebra_glm::vec3(5.0, 2.0, 0.0)),
                record_with_ball(nalgebra_glm::vec3(6.0, 2.0, 0.0)),
                missing_ball_record(),
            ],
        };
        assert_eq!(recording.interpolate_ball_gaps(), 2);
        assert_eq!(recording.records[0].ball, nalgebra_glm::vec3(5.0, 2.0, 0.0));
        assert_eq!(recording.records[3].ball, nalgebra_glm::vec3(6.0, 2.0, 0.0));
    }

    #[test]
    fn ball_never_detected_leaves_the_recording_untouched() {
        let mut recording = Recording {
            records: vec![missing_ball_record(), missing_ball_record()],
        };
        assert_eq!(recording.interpolate_ball_gaps(), 0);
        assert!(recording.records.iter().all(|r| r.ball_missing()));
    }

    #[test]
    fn single_detection_is_held_everywhere() {
        let mut recording = Recording {
            records: vec![
                missing_ball_record(),
                record_with_ball(nalgebra_glm::vec3(1.0, 2.0, 3.0)),
                missing_ball_record(),
            ],
        };
        assert_eq!(recording.interpolate_ball_gaps(), 2);
        for record in &recording.records {
            assert_eq!(record.ball, nalgebra_glm::vec3(1.0, 2.0, 3.0));
        }
    }
}
