//! # Block Module
//!
//! This module provides the core block-related functionality for the voxel engine.
//! It includes block type definitions, block face handling, and block data structures.

use block_type::BlockType;

pub mod block_side;
pub mod block_type;

/// The underlying integer type used to represent block types in memory.
/// This is used for efficient storage of block data.
pub type BlockTypeSize = u8;

/// Represents a single voxel block in the world.
///
/// A block has no identity beyond its grid slot; it only stores its material.
///
/// # Memory Layout
/// The `#[repr(C)]` attribute ensures a consistent memory layout so a whole
/// grid can be viewed as raw bytes. The block type is stored as a compact
/// `BlockTypeSize`.
#[repr(C)]
#[derive(Copy, Clone, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct Block {
    /// The type of this block, encoded as a `BlockTypeSize` for compact storage.
    pub block_type: BlockTypeSize,
}

impl Block {
    /// An air block, the value every voxel slot is initialized to.
    pub const AIR: Block = Block {
        block_type: BlockType::AIR as BlockTypeSize,
    };

    /// Creates a new block of the specified type.
    ///
    /// # Arguments
    /// * `block_type` - The type of block to create
    ///
    /// # Returns
    /// A new `Block` instance with the specified type.
    pub fn new(block_type: BlockType) -> Self {
        Block {
            block_type: block_type as BlockTypeSize,
        }
    }

    /// Gets the material of this block.
    ///
    /// Ids that no material uses read back as air.
    pub fn get_block_type(&self) -> BlockType {
        BlockType::get_block_type_from_int(self.block_type).unwrap_or(BlockType::AIR)
    }

    /// Returns `true` if this block does not occlude adjacent faces.
    pub fn is_translucent(&self) -> bool {
        self.get_block_type().is_translucent()
    }
}
