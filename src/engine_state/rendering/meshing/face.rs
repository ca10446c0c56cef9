use crate::engine_state::voxels::block::block_side::BlockSide;

/// Corner offsets of the unit quad on each side of a block, indexed by `BlockSide`.
///
/// Corners are wound counter-clockwise when viewed from outside the block, so
/// both triangles of [`FACE_INDICES`] face along the side's normal.
pub const FACE_VERTICES: [[[f32; 3]; 4]; 6] = [
    // UP
    [[0.0, 1.0, 0.0], [0.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 0.0]],
    // DOWN
    [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 1.0], [0.0, 0.0, 1.0]],
    // LEFT
    [[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 1.0], [0.0, 1.0, 0.0]],
    // RIGHT
    [[1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 1.0, 1.0], [1.0, 0.0, 1.0]],
    // FRONT
    [[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 1.0], [0.0, 1.0, 1.0]],
    // BACK
    [[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0], [1.0, 0.0, 0.0]],
];

/// Two triangles per quad, relative to the quad's first vertex.
pub const FACE_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

/// Number of vertices each emitted face contributes.
pub const VERTICES_PER_FACE: usize = 4;

/// Number of indices each emitted face contributes.
pub const INDICES_PER_FACE: usize = FACE_INDICES.len();

/// Returns the four corners of `side`'s quad for the block at `position`.
pub fn face_corners(position: [usize; 3], side: BlockSide) -> [[f32; 3]; 4] {
    let origin = position.map(|component| component as f32);
    FACE_VERTICES[side as usize].map(|corner| {
        [
            origin[0] + corner[0],
            origin[1] + corner[1],
            origin[2] + corner[2],
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
    }

    fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]
    }

    #[test]
    fn templates_wind_towards_their_normal() {
        for side in BlockSide::all() {
            let quad = FACE_VERTICES[side as usize];
            for triangle in FACE_INDICES.chunks(3) {
                let a = quad[triangle[0] as usize];
                let b = quad[triangle[1] as usize];
                let c = quad[triangle[2] as usize];
                assert_eq!(cross(sub(b, a), sub(c, a)), side.normal(), "{:?}", side);
            }
        }
    }

    #[test]
    fn templates_lie_on_their_side_of_the_cube() {
        for side in BlockSide::all() {
            let offset = side.offset();
            let axis = offset.iter().position(|&c| c != 0).unwrap();
            let plane = if offset[axis] > 0 { 1.0 } else { 0.0 };
            for corner in FACE_VERTICES[side as usize] {
                assert_eq!(corner[axis], plane, "{:?}", side);
            }
        }
    }

    #[test]
    fn corners_are_offset_by_block_position() {
        let corners = face_corners([2, 60, 5], BlockSide::UP);
        assert_eq!(corners[0], [2.0, 61.0, 5.0]);
        assert_eq!(corners[2], [3.0, 61.0, 6.0]);
    }
}
