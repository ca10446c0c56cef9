//! # Block Side Module
//!
//! This module defines the six axis-aligned faces of a voxel block, the
//! neighbour step each face looks across, and the normal it is shaded with.

/// Represents the six possible faces of a voxel block.
///
/// Each variant is assigned a unique integer value which indexes the face
/// templates used by the mesher.
///
/// The order is: [UP, DOWN, LEFT, RIGHT, FRONT, BACK]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The top face (facing positive Y)
    UP = 0,

    /// The bottom face (facing negative Y)
    DOWN = 1,

    /// The left face (facing negative X)
    LEFT = 2,

    /// The right face (facing positive X)
    RIGHT = 3,

    /// The front face (facing positive Z)
    FRONT = 4,

    /// The back face (facing negative Z)
    BACK = 5,
}

impl BlockSide {
    /// Returns an array containing all six block faces in a consistent order.
    ///
    /// The order is: [UP, DOWN, LEFT, RIGHT, FRONT, BACK]
    pub const fn all() -> [BlockSide; 6] {
        [
            BlockSide::UP,
            BlockSide::DOWN,
            BlockSide::LEFT,
            BlockSide::RIGHT,
            BlockSide::FRONT,
            BlockSide::BACK,
        ]
    }

    /// The unit step from a voxel to the neighbour this face looks at.
    pub const fn offset(self) -> [i32; 3] {
        match self {
            BlockSide::UP => [0, 1, 0],
            BlockSide::DOWN => [0, -1, 0],
            BlockSide::LEFT => [-1, 0, 0],
            BlockSide::RIGHT => [1, 0, 0],
            BlockSide::FRONT => [0, 0, 1],
            BlockSide::BACK => [0, 0, -1],
        }
    }

    /// The outward normal shared by every vertex of this face.
    pub fn normal(self) -> [f32; 3] {
        self.offset().map(|component| component as f32)
    }

    /// Returns `true` for the faces whose neighbour may live in another chunk.
    ///
    /// Chunks span the full world height, so only the horizontal faces can
    /// cross a chunk boundary.
    pub const fn is_horizontal(self) -> bool {
        !matches!(self, BlockSide::UP | BlockSide::DOWN)
    }
}
