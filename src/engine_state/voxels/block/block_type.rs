//! # Block Type Module
//!
//! This module defines the different materials a voxel can hold and the
//! visibility classification the mesher relies on.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use super::BlockTypeSize;

/// Enumerates all possible block materials in the voxel world.
///
/// The discriminants are the material ids written into every vertex of a face,
/// so they must stay stable. The `FromPrimitive` derive allows conversion back
/// from the compact storage integer.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockType {
    /// Empty space. Every voxel slot starts as air.
    AIR = 0,

    /// Water, placed at the water layer during terrain generation.
    WATER = 1,

    /// The surface material of each terrain column.
    DIRT = 2,

    /// Everything below the terrain surface.
    COBBLESTONE = 3,
}

impl BlockType {
    /// Converts a `BlockTypeSize` to a `BlockType`.
    ///
    /// # Arguments
    /// * `btype` - The block type as a `BlockTypeSize`
    ///
    /// # Returns
    /// The corresponding `BlockType`, or `None` for an id no material uses.
    pub fn get_block_type_from_int(btype: BlockTypeSize) -> Option<Self> {
        FromPrimitive::from_u8(btype)
    }

    /// Returns `true` if this material does not occlude an adjacent face.
    ///
    /// Only air and water are translucent. This is a meshing classification,
    /// not a blend mode.
    pub fn is_translucent(self) -> bool {
        matches!(self, BlockType::AIR | BlockType::WATER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_air_and_water_are_translucent() {
        assert!(BlockType::AIR.is_translucent());
        assert!(BlockType::WATER.is_translucent());
        assert!(!BlockType::DIRT.is_translucent());
        assert!(!BlockType::COBBLESTONE.is_translucent());
    }

    #[test]
    fn converts_from_storage_integer() {
        assert_eq!(BlockType::get_block_type_from_int(3), Some(BlockType::COBBLESTONE));
        assert_eq!(BlockType::get_block_type_from_int(200), None);
    }
}
