//! # Block Grid Module
//!
//! Dense storage for the blocks of a single chunk.
//!
//! ## Memory Layout
//!
//! Blocks are stored in one contiguous boxed slice of `CHUNK_VOLUME` entries,
//! addressed by the linear index `x + z * CHUNK_LENGTH + y * CHUNK_LENGTH * CHUNK_WIDTH`.
//! Consecutive x values are adjacent in memory, then rows of z, then whole
//! horizontal layers of y.
//!
//! The slice is allocated once when the chunk is created and released when the
//! chunk is dropped. It is never shared outside the owning chunk.

use crate::engine_state::voxels::block::{block_type::BlockType, Block};

use super::{CHUNK_HEIGHT, CHUNK_LENGTH, CHUNK_VOLUME, CHUNK_WIDTH};

/// Computes the linear index of a local block position.
///
/// Only meaningful for `x < CHUNK_LENGTH`, `y < CHUNK_HEIGHT` and `z < CHUNK_WIDTH`.
#[inline]
pub const fn block_index(x: usize, y: usize, z: usize) -> usize {
    x + z * CHUNK_LENGTH + y * CHUNK_LENGTH * CHUNK_WIDTH
}

/// Returns `true` if the local position lies inside a chunk.
#[inline]
pub fn in_bounds(x: i32, y: i32, z: i32) -> bool {
    (0..CHUNK_LENGTH as i32).contains(&x)
        && (0..CHUNK_HEIGHT as i32).contains(&y)
        && (0..CHUNK_WIDTH as i32).contains(&z)
}

/// A fixed-size, owned 3D array of blocks.
pub struct BlockGrid {
    blocks: Box<[Block]>,
}

impl BlockGrid {
    /// Reserves storage for a full chunk with every slot set to air.
    ///
    /// # Aborts
    /// A chunk cannot exist without its storage, so if the allocation cannot be
    /// satisfied the failure is logged and the process is aborted.
    pub fn allocate() -> Self {
        let mut blocks = Vec::new();
        if let Err(err) = blocks.try_reserve_exact(CHUNK_VOLUME) {
            log::error!(
                "Failed to allocate {} blocks of chunk storage: {}",
                CHUNK_VOLUME,
                err
            );
            std::process::abort();
        }
        blocks.resize(CHUNK_VOLUME, Block::AIR);

        BlockGrid {
            blocks: blocks.into_boxed_slice(),
        }
    }

    /// Gets the block at the given local coordinates.
    ///
    /// # Panics
    /// Panics if the index falls outside the grid. Callers at a chunk boundary
    /// must route through the neighbour-aware logic in the mesher instead.
    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> Block {
        debug_assert!(x < CHUNK_LENGTH && y < CHUNK_HEIGHT && z < CHUNK_WIDTH);
        self.blocks[block_index(x, y, z)]
    }

    /// Sets the material of the block at the given local coordinates.
    ///
    /// # Panics
    /// Panics if the index falls outside the grid.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: usize, block_type: BlockType) {
        debug_assert!(x < CHUNK_LENGTH && y < CHUNK_HEIGHT && z < CHUNK_WIDTH);
        self.blocks[block_index(x, y, z)] = Block::new(block_type);
    }

    /// Returns `true` if the block at the given coordinates is air or water.
    ///
    /// This is the only visibility test used while meshing.
    #[inline]
    pub fn is_translucent(&self, x: usize, y: usize, z: usize) -> bool {
        self.get(x, y, z).is_translucent()
    }

    /// Views the grid as raw bytes, one byte per block.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.blocks)
    }

    /// Resets every slot to air.
    pub fn clear(&mut self) {
        self.blocks.fill(Block::AIR);
    }
}
