//! # Engine State Module
//!
//! The chunk subsystem of the voxel engine.
//!
//! ## Key Components
//!
//! * `voxels` - Blocks, chunks, terrain generation and the chunk registry
//! * `rendering` - Vertex format and visible geometry generation
//! * `gpu_commands` - The GPU operations chunks depend on, and a headless backend
//! * `buffer_state` - The wgpu backend
//!
//! ## Architecture
//!
//! Each chunk runs a strict sequential pipeline: construction, terrain
//! generation, meshing, upload, then one draw per non-empty pass every frame.
//! Meshing reads neighbouring chunks through the `ChunkLookup` capability and
//! the GPU is only reached through a `GpuDevice`, so every stage can run without
//! a window or a graphics adapter.

pub mod buffer_state;
pub mod gpu_commands;
pub mod rendering;
pub mod voxels;
