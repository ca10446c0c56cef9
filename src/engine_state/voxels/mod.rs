//! # Voxel Engine Core
//!
//! This module contains the voxel data side of the engine.
//!
//! ## Architecture
//!
//! * **Block**: Block materials and the six faces of a block
//! * **Chunk**: Dense fixed-size block storage, terrain generation and per-pass GPU state
//! * **World**: The registry of loaded chunks and the lookup meshing uses to see across chunk edges
//!
//! ## Data Flow
//!
//! 1. The world loads a chunk at a chunk-aligned world position
//! 2. The chunk fills its blocks from the heightmap of its position
//! 3. The chunk meshes itself against the chunks loaded around it
//! 4. The meshes are uploaded and drawn every frame
//!
//! ## Thread Safety
//!
//! Nothing here synchronizes. Meshing reads neighbouring chunks while holding a
//! shared borrow of the registry, so the registry cannot change while a chunk is
//! being meshed.

pub mod block;
pub mod chunk;
pub mod world;
