use crate::capture::Landmark;
use crate::error::{PoseError, Result};

/// Skeleton adjacency: which joint pairs get a segment drawn between them.
/// Ordered, fixed at startup; one segment visual exists per entry. The last
/// four entries close the heel/toe/ankle triangle of each foot.
pub const SKELETON_EDGES: [(Landmark, Landmark); 28] = [
    // left eye line
    (Landmark::Nose, Landmark::LeftEyeInner),
    (Landmark::LeftEyeInner, Landmark::LeftEye),
    (Landmark::LeftEye, Landmark::LeftEyeOuter),
    (Landmark::LeftEyeOuter, Landmark::LeftEar),
    // right eye line
    (Landmark::Nose, Landmark::RightEyeInner),
    (Landmark::RightEyeInner, Landmark::RightEye),
    (Landmark::RightEye, Landmark::RightEyeOuter),
    (Landmark::RightEyeOuter, Landmark::RightEar),
    // mouth
    (Landmark::MouthLeft, Landmark::MouthRight),
    // shoulders and arms
    (Landmark::LeftShoulder, Landmark::RightShoulder),
    (Landmark::RightShoulder, Landmark::RightElbow),
    (Landmark::RightElbow, Landmark::RightWrist),
    (Landmark::LeftShoulder, Landmark::LeftElbow),
    (Landmark::LeftElbow, Landmark::LeftWrist),
    (Landmark::LeftWrist, Landmark::LeftPinky),
    // torso
    (Landmark::LeftShoulder, Landmark::LeftHip),
    (Landmark::RightShoulder, Landmark::RightHip),
    (Landmark::LeftHip, Landmark::RightHip),
    // legs
    (Landmark::LeftHip, Landmark::LeftKnee),
    (Landmark::RightHip, Landmark::RightKnee),
    (Landmark::LeftKnee, Landmark::LeftAnkle),
    (Landmark::LeftAnkle, Landmark::LeftHeel),
    (Landmark::RightKnee, Landmark::RightAnkle),
    (Landmark::RightAnkle, Landmark::RightHeel),
    // feet
    (Landmark::LeftHeel, Landmark::LeftFootIndex),
    (Landmark::RightHeel, Landmark::RightFootIndex),
    (Landmark::RightFootIndex, Landmark::RightAnkle),
    (Landmark::LeftFootIndex, Landmark::LeftAnkle),
];

pub const EDGE_COUNT: usize = SKELETON_EDGES.len();

/// Every edge endpoint must fit the rig. Checked once, at startup, so a
/// mismatched rig never gets as far as drawing.
pub fn validate_edges(joint_count: usize) -> Result<()> {
    for (index, (a, b)) in SKELETON_EDGES.iter().enumerate() {
        for landmark in [a, b] {
            if landmark.index() >= joint_count {
                return Err(PoseError::EdgeOutOfRange {
                    index,
                    landmark: landmark.index(),
                    joint_count,
                });
            }
        }
    }
    Ok(())
}
