//! # Chunk Module
//!
//! This module provides the `Chunk` struct, the unit of world storage and
//! rendering. A chunk owns a dense grid of `CHUNK_LENGTH x CHUNK_HEIGHT x CHUNK_WIDTH`
//! blocks, the heightmap its terrain was generated from, and the geometry and
//! GPU handles of its two render passes.
//!
//! ## Lifecycle
//!
//! 1. [`Chunk::new`] allocates the block grid (all air) and the GPU buffers of both passes
//! 2. [`Chunk::gen_terrain`] fills the grid from the chunk's world position
//! 3. [`Chunk::gen_visible_geometry`] rebuilds the geometry of both passes
//! 4. [`Chunk::update_terrain`] uploads that geometry
//! 5. Every frame, [`Chunk::render`] records a draw for each pass that [`Chunk::need_render`]
//! 6. [`Chunk::release`] frees the GPU resources when the chunk is unloaded
//!
//! The geometry is stale whenever blocks of this chunk, or of a neighbour along
//! a shared edge, change after step 3. Meshing is always a full rebuild.

use cgmath::Point3;

use crate::engine_state::{
    gpu_commands::GpuDevice,
    rendering::meshing::{build_visible_geometry, PassGeometry, RenderPass, RENDER_PASS_COUNT},
};

use super::{
    block::{block_type::BlockType, Block},
    world::ChunkLookup,
};

use block_grid::BlockGrid;
use render_data::RenderData;
use terrain::TerrainConfig;

pub mod block_grid;
pub mod render_data;
pub mod terrain;

/// Extent of a chunk along the x axis, in blocks.
pub const CHUNK_LENGTH: usize = 16;
/// Extent of a chunk along the z axis, in blocks.
pub const CHUNK_WIDTH: usize = 16;
/// Extent of a chunk along the y axis, in blocks. Chunks span the whole world height.
pub const CHUNK_HEIGHT: usize = 128;
/// The total number of blocks in a chunk.
pub const CHUNK_VOLUME: usize = CHUNK_LENGTH * CHUNK_WIDTH * CHUNK_HEIGHT;

/// A `CHUNK_LENGTH x CHUNK_HEIGHT x CHUNK_WIDTH` region of the voxel world.
pub struct Chunk {
    /// World-space origin of this chunk. `x` and `z` are multiples of the chunk
    /// length and width, `y` is always 0.
    position: Point3<i32>,

    /// The blocks of this chunk.
    blocks: BlockGrid,

    /// Terrain height of every column, indexed by `x + z * CHUNK_LENGTH`.
    /// Empty until terrain has been generated.
    height_map: Vec<i32>,

    /// Geometry and GPU handles, indexed by [`RenderPass::index`].
    render_data: [RenderData; RENDER_PASS_COUNT],
}

impl Chunk {
    /// Creates a chunk filled with air and allocates its GPU resources.
    ///
    /// # Arguments
    /// * `position` - World-space origin of the chunk
    /// * `device` - The device the chunk's buffers and vertex arrays are created on
    pub fn new(position: Point3<i32>, device: &mut dyn GpuDevice) -> Self {
        Chunk {
            position,
            blocks: BlockGrid::allocate(),
            height_map: Vec::new(),
            render_data: RenderData::for_all_passes(device),
        }
    }

    /// World-space origin of this chunk.
    pub fn position(&self) -> Point3<i32> {
        self.position
    }

    /// Gets the block at the specified chunk-relative coordinates.
    ///
    /// # Panics
    /// Panics if the coordinates are out of bounds.
    pub fn get_block_at(&self, x: usize, y: usize, z: usize) -> Block {
        self.blocks.get(x, y, z)
    }

    /// Sets the block at the specified chunk-relative coordinates.
    ///
    /// The geometry is not rebuilt; call [`Chunk::gen_visible_geometry`] afterwards.
    ///
    /// # Panics
    /// Panics if the coordinates are out of bounds.
    pub fn set_block_at(&mut self, x: usize, y: usize, z: usize, block_type: BlockType) {
        self.blocks.set(x, y, z, block_type);
    }

    /// Returns `true` if the block at the coordinates does not occlude its neighbours.
    ///
    /// # Panics
    /// Panics if the coordinates are out of bounds.
    pub fn is_translucent(&self, x: usize, y: usize, z: usize) -> bool {
        self.blocks.is_translucent(x, y, z)
    }

    /// The block grid of this chunk.
    pub fn blocks(&self) -> &BlockGrid {
        &self.blocks
    }

    /// The heightmap produced by terrain generation.
    pub fn height_map(&self) -> &[i32] {
        &self.height_map
    }

    /// The terrain height of column `(x, z)`, if terrain has been generated.
    pub fn height_at(&self, x: usize, z: usize) -> Option<i32> {
        self.height_map.get(x + z * CHUNK_LENGTH).copied()
    }

    /// The geometry of `pass` as of the last meshing run.
    pub fn geometry(&self, pass: RenderPass) -> &PassGeometry {
        &self.render_data[pass.index()].geometry
    }

    /// The render data of `pass`.
    pub fn render_data(&self, pass: RenderPass) -> &RenderData {
        &self.render_data[pass.index()]
    }

    /// Rebuilds the visible geometry of both passes.
    ///
    /// # Arguments
    /// * `neighbors` - Resolves the adjacent chunks for faces on a chunk edge
    /// * `config` - Terrain parameters, used to locate the water layer
    pub fn gen_visible_geometry(&mut self, neighbors: &dyn ChunkLookup, config: &TerrainConfig) {
        let geometry = build_visible_geometry(self, neighbors, config);
        self.set_geometry(geometry);
    }

    /// Replaces the geometry of both passes with a prebuilt set.
    ///
    /// Used when the chunk itself lives inside the registry that resolves its
    /// neighbours and cannot be borrowed mutably while meshing.
    pub fn set_geometry(&mut self, geometry: [PassGeometry; RENDER_PASS_COUNT]) {
        for (render_data, geometry) in self.render_data.iter_mut().zip(geometry) {
            render_data.geometry = geometry;
        }
    }
}
