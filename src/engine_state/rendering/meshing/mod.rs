//! Visible geometry generation for voxel chunks.
//!
//! This module converts the block grid of a chunk into the minimal set of
//! visible quads. It uses naive per-voxel face culling: each solid voxel tests
//! its six neighbours and emits one quad per open side. Coplanar faces are not
//! merged.
//!
//! # Architecture
//! - [`RenderPass`]: The two independent outputs of meshing, opaque terrain and the water surface
//! - [`PassGeometry`]: Vertex and index lists for one pass
//! - [`MeshBuilder`]: The voxel walk, parameterized by a [`FaceEmissionPolicy`]
//!
//! # Boundary Faces
//! Faces on a horizontal chunk edge are resolved against the adjacent chunk via
//! a [`ChunkLookup`]. A missing neighbour hides the face; the caller is expected
//! to re-mesh once the neighbour loads.
//!
//! # Usage
//! ```
//! use voxel_chunks::{build_visible_geometry, Chunk, HeadlessDevice, NoNeighbors, RenderPass, TerrainConfig};
//! use cgmath::Point3;
//!
//! let mut device = HeadlessDevice::new();
//! let mut chunk = Chunk::new(Point3::new(0, 0, 0), &mut device);
//! chunk.gen_terrain(&noise::Constant::new(0.0), &TerrainConfig::default()).unwrap();
//!
//! let [geometry, water] = build_visible_geometry(&chunk, &NoNeighbors, &TerrainConfig::default());
//! assert_eq!(geometry.face_count(), 16 * 16 * 2);
//! assert!(water.vertices.is_empty());
//! ```

mod face;
mod mesh_builder;
mod pass_geometry;

pub use face::{face_corners, FACE_INDICES, FACE_VERTICES, INDICES_PER_FACE, VERTICES_PER_FACE};
pub use mesh_builder::{
    is_neighbor_open, FaceEmissionPolicy, MeshBuilder, OpaquePolicy, WaterSurfacePolicy,
};
pub use pass_geometry::{PassGeometry, RESERVED_GEOMETRY};

use web_time::Instant;

use crate::engine_state::voxels::{
    chunk::{terrain::TerrainConfig, Chunk},
    world::ChunkLookup,
};

/// The independent geometry sets every chunk renders.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RenderPass {
    /// Opaque terrain
    GEOMETRY = 0,
    /// The water surface
    WATER = 1,
}

/// Number of render passes per chunk.
pub const RENDER_PASS_COUNT: usize = 2;

impl RenderPass {
    /// Returns both passes in index order.
    pub fn all() -> [RenderPass; RENDER_PASS_COUNT] {
        [RenderPass::GEOMETRY, RenderPass::WATER]
    }

    /// The slot of this pass in per-chunk arrays.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Rebuilds both passes of `chunk` from scratch.
///
/// # Arguments
/// * `chunk` - The chunk to mesh
/// * `neighbors` - Resolves the chunks adjacent to `chunk`
/// * `config` - Terrain parameters, used to locate the water layer
///
/// # Returns
/// The geometry for each pass, indexed by [`RenderPass::index`].
pub fn build_visible_geometry(
    chunk: &Chunk,
    neighbors: &dyn ChunkLookup,
    config: &TerrainConfig,
) -> [PassGeometry; RENDER_PASS_COUNT] {
    let start = Instant::now();
    let builder = MeshBuilder::new(chunk, neighbors);

    let water_policy = WaterSurfacePolicy {
        water_height: config.water_height.max(0) as usize,
    };
    let geometry = [builder.build(&OpaquePolicy), builder.build(&water_policy)];

    log::debug!(
        "Meshed chunk at {:?}: {} opaque faces, {} water faces in {:?}",
        chunk.position(),
        geometry[RenderPass::GEOMETRY.index()].face_count(),
        geometry[RenderPass::WATER.index()].face_count(),
        start.elapsed()
    );

    geometry
}
