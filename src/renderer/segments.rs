//! Pose geometry rebuilt every tick: one camera-facing quad per skeleton
//! edge, plus a line cross marking the ball. Vertex counts are fixed at
//! startup so both buffers can be allocated once and rewritten in place.

use nalgebra_glm::Vec3;

use crate::renderer::line_vertex::LineVertex;
use crate::rig::{EDGE_COUNT, Rig, SKELETON_EDGES};

/// Stroke width of a skeleton segment, in capture units, same at both ends.
pub const SEGMENT_WIDTH: f32 = 0.05;

/// Half-extent of the ball marker cross.
pub const BALL_CROSS_HALF_EXTENT: f32 = 0.1;

/// Vertices a full segment rebuild writes: two triangles per edge.
pub const SEGMENT_VERTEX_COUNT: usize = EDGE_COUNT * 6;

/// Vertices of the ball cross: three axis lines.
pub const BALL_VERTEX_COUNT: usize = 6;

const DEGENERATE: f32 = 1e-8;

/// Expands the segment `a -> b` into a quad of width `2 * half_width` facing
/// `eye`, as two triangles. The quad's long edges run exactly from `a` to
/// `b`; only the width is view-dependent. Degenerate segments (zero length,
/// or seen exactly end-on) fall back to a fixed perpendicular so the result
/// is always finite.
pub fn expand_segment(a: Vec3, b: Vec3, eye: Vec3, half_width: f32) -> [Vec3; 6] {
    let axis = b - a;
    if nalgebra_glm::length2(&axis) < DEGENERATE {
        return [a; 6];
    }

    let mid = (a + b) * 0.5;
    let to_eye = eye - mid;
    let mut side = nalgebra_glm::cross(&axis, &to_eye);
    if nalgebra_glm::length2(&side) < DEGENERATE {
        // segment points straight at the eye; any perpendicular will do
        let fallback = if axis.x.abs() < axis.y.abs() {
            nalgebra_glm::vec3(1.0, 0.0, 0.0)
        } else {
            nalgebra_glm::vec3(0.0, 1.0, 0.0)
        };
        side = nalgebra_glm::cross(&axis, &fallback);
    }
    let side = nalgebra_glm::normalize(&side) * half_width;

    let (a0, a1) = (a - side, a + side);
    let (b0, b1) = (b - side, b + side);
    [a0, b0, b1, a0, b1, a1]
}

/// One quad per adjacency entry, in table order, from the rig's current
/// world positions.
pub fn segment_vertices(rig: &Rig, eye: Vec3, color: [f32; 3]) -> Vec<LineVertex> {
    let mut vertices = Vec::with_capacity(SEGMENT_VERTEX_COUNT);
    for (start, end) in SKELETON_EDGES {
        let quad = expand_segment(
            rig.joint_world(start),
            rig.joint_world(end),
            eye,
            SEGMENT_WIDTH * 0.5,
        );
        for corner in quad {
            vertices.push(LineVertex::new(corner, color));
        }
    }
    vertices
}

/// Axis-aligned line cross at the ball's world position.
pub fn ball_cross_vertices(center: Vec3, color: [f32; 3]) -> Vec<LineVertex> {
    let h = BALL_CROSS_HALF_EXTENT;
    let offsets = [
        nalgebra_glm::vec3(h, 0.0, 0.0),
        nalgebra_glm::vec3(0.0, h, 0.0),
        nalgebra_glm::vec3(0.0, 0.0, h),
    ];
    let mut vertices = Vec::with_capacity(BALL_VERTEX_COUNT);
    for offset in offsets {
        vertices.push(LineVertex::new(center - offset, color));
        vertices.push(LineVertex::new(center + offset, color));
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{Landmark, RECORD_VALUES, Record};
    use crate::rig::RigConfig;

    const EPS: f32 = 1e-5;

    fn assert_close(a: Vec3, b: Vec3) {
        assert!(
            nalgebra_glm::length(&(a - b)) < EPS,
            "expected {a:?} ~ {b:?}"
        );
    }

    fn posed_rig() -> Rig {
        let line = (1..=RECORD_VALUES)
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let mut rig = Rig::new(RigConfig::default()).unwrap();
        rig.apply(&Record::parse(&line, 1).unwrap());
        rig
    }

    #[test]
    fn quad_edges_run_between_the_joint_positions() {
        let a = nalgebra_glm::vec3(0.0, 0.0, 0.0);
        let b = nalgebra_glm::vec3(2.0, 0.0, 0.0);
        let eye = nalgebra_glm::vec3(1.0, 0.0, 5.0);
        let [a0, b0, b1, a0_again, b1_again, a1] = expand_segment(a, b, eye, 0.5);

        assert_eq!(a0, a0_again);
        assert_eq!(b1, b1_again);
        // corner midpoints collapse back onto the endpoints
        assert_close((a0 + a1) * 0.5, a);
        assert_close((b0 + b1) * 0.5, b);
    }

    #[test]
    fn quad_width_matches_the_stroke() {
        let a = nalgebra_glm::vec3(0.0, 1.0, 0.0);
        let b = nalgebra_glm::vec3(0.0, 3.0, 0.0);
        let eye = nalgebra_glm::vec3(0.0, 2.0, 4.0);
        let half = SEGMENT_WIDTH * 0.5;
        let [a0, _, _, _, _, a1] = expand_segment(a, b, eye, half);

        let width = nalgebra_glm::length(&(a1 - a0));
        assert!((width - SEGMENT_WIDTH).abs() < EPS);
        // width is perpendicular to the segment
        assert!(nalgebra_glm::dot(&(a1 - a0), &(b - a)).abs() < EPS);
    }

    #[test]
    fn zero_length_segment_stays_finite() {
        let p = nalgebra_glm::vec3(1.0, 2.0, 3.0);
        let quad = expand_segment(p, p, nalgebra_glm::vec3(0.0, 0.0, 5.0), 0.5);
        for corner in quad {
            assert_eq!(corner, p);
        }
    }

    #[test]
    fn end_on_segment_falls_back_to_a_finite_perpendicular() {
        // segment along the view direction: cross(axis, to_eye) vanishes
        let a = nalgebra_glm::vec3(0.0, 0.0, 1.0);
        let b = nalgebra_glm::vec3(0.0, 0.0, 3.0);
        let eye = nalgebra_glm::vec3(0.0, 0.0, 6.0);
        let quad = expand_segment(a, b, eye, 0.5);

        for corner in quad {
            assert!(corner.x.is_finite() && corner.y.is_finite() && corner.z.is_finite());
        }
        let width = nalgebra_glm::length(&(quad[5] - quad[0]));
        assert!((width - 1.0).abs() < EPS);
    }

    #[test]
    fn one_quad_per_adjacency_entry_in_table_order() {
        let rig = posed_rig();
        let eye = nalgebra_glm::vec3(0.0, 0.0, 50.0);
        let vertices = segment_vertices(&rig, eye, [1.0, 1.0, 1.0]);
        assert_eq!(vertices.len(), SEGMENT_VERTEX_COUNT);

        // first quad belongs to the first table entry
        let (start, end) = SKELETON_EDGES[0];
        let a = rig.joint_world(start);
        let b = rig.joint_world(end);
        let a0 = Vec3::from(vertices[0].position);
        let a1 = Vec3::from(vertices[5].position);
        let b0 = Vec3::from(vertices[1].position);
        let b1 = Vec3::from(vertices[2].position);
        assert_close((a0 + a1) * 0.5, a);
        assert_close((b0 + b1) * 0.5, b);
    }

    #[test]
    fn segment_endpoints_track_the_rig_pose() {
        let rig = posed_rig();
        let eye = nalgebra_glm::vec3(5.0, 5.0, 50.0);
        let vertices = segment_vertices(&rig, eye, [1.0, 1.0, 1.0]);

        for (i, (start, end)) in SKELETON_EDGES.iter().enumerate() {
            let base = i * 6;
            let a0 = Vec3::from(vertices[base].position);
            let a1 = Vec3::from(vertices[base + 5].position);
            let b0 = Vec3::from(vertices[base + 1].position);
            let b1 = Vec3::from(vertices[base + 2].position);
            assert_close((a0 + a1) * 0.5, rig.joint_world(*start));
            assert_close((b0 + b1) * 0.5, rig.joint_world(*end));
        }
    }

    #[test]
    fn ball_cross_is_centered_on_the_ball() {
        let center = nalgebra_glm::vec3(4.0, 2.0, 1.0);
        let vertices = ball_cross_vertices(center, [1.0, 0.5, 0.0]);
        assert_eq!(vertices.len(), BALL_VERTEX_COUNT);

        for pair in vertices.chunks(2) {
            let lo = Vec3::from(pair[0].position);
            let hi = Vec3::from(pair[1].position);
            assert_close((lo + hi) * 0.5, center);
            assert!(
                (nalgebra_glm::length(&(hi - lo)) - 2.0 * BALL_CROSS_HALF_EXTENT).abs() < EPS
            );
        }
    }

    #[test]
    fn nose_segment_uses_the_posed_nose_position() {
        let rig = posed_rig();
        // nose is joint 0: local (1,2,3) under an identity root
        assert_close(
            rig.joint_world(Landmark::Nose),
            nalgebra_glm::vec3(1.0, 2.0, 3.0),
        );
    }
}
