#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Chunks
//!
//! The chunk subsystem of a blocky-world renderer: fixed-size grids of typed
//! blocks, heightmap terrain that stays seamless across chunks, face-culled
//! meshing that looks across chunk edges, and GPU buffers kept in sync with
//! the resulting meshes.
//!
//! ## Key Modules
//!
//! * `engine_state::voxels` - Blocks, chunks, terrain and the chunk registry
//! * `engine_state::rendering` - Vertex format and visible geometry generation
//! * `engine_state::gpu_commands` - The GPU operations chunks depend on
//! * `engine_state::buffer_state` - The wgpu implementation of those operations
//!
//! ## Usage
//!
//! ```
//! use voxel_chunks::{CommandQueue, HeadlessDevice, RenderPass, TerrainConfig, World};
//! use cgmath::Point3;
//!
//! let mut device = HeadlessDevice::new();
//! let mut world = World::new(TerrainConfig::default(), 42).unwrap();
//! world.add_chunk_at(Point3::new(0, 0, 0), &mut device);
//! world.add_chunk_at(Point3::new(16, 0, 0), &mut device);
//! world.remesh_neighbors_of(Point3::new(16, 0, 0), &mut device);
//!
//! let mut commands = CommandQueue::new();
//! world.render(RenderPass::GEOMETRY, &mut commands);
//! assert_eq!(commands.draw_count(), 2);
//! ```

pub mod engine_state;

pub use engine_state::{
    buffer_state::BufferState,
    gpu_commands::{
        BufferHandle, BufferKind, BufferUsageHint, CommandQueue, GpuDevice, HeadlessDevice,
        PrimitiveType, RenderCommand, VertexArrayHandle,
    },
    rendering::{
        meshing::{build_visible_geometry, PassGeometry, RenderPass},
        vertex::{Vertex, VertexLayout},
    },
    voxels::{
        block::{block_side::BlockSide, block_type::BlockType, Block},
        chunk::{
            terrain::{ConfigError, TerrainConfig},
            Chunk, CHUNK_HEIGHT, CHUNK_LENGTH, CHUNK_VOLUME, CHUNK_WIDTH,
        },
        world::{ChunkLookup, NoNeighbors, World},
    },
};

/// Initializes `env_logger`, writing to stdout and filtered by `RUST_LOG`.
///
/// Calling it more than once is harmless; later calls are ignored.
pub fn init_logging() {
    let mut log_builder = env_logger::Builder::new();
    let _ = log_builder
        .target(env_logger::Target::Stdout)
        .filter_level(log::LevelFilter::Info)
        .parse_env("RUST_LOG")
        .try_init();
}
