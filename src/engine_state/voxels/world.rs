//! # World Module
//!
//! This module provides the [`ChunkLookup`] capability meshing uses to resolve
//! faces on chunk edges, and [`World`], a registry of loaded chunks that
//! implements it.
//!
//! ## Chunk Pipeline
//!
//! Loading a chunk runs its whole pipeline in order: construction, terrain
//! generation, meshing against the chunks loaded at that moment, and upload.
//! Loading a chunk does not re-mesh the chunks around it. Their edge faces
//! toward the new chunk stay hidden until the caller asks for it with
//! [`World::remesh_neighbors_of`].
//!
//! ## GPU Resources
//!
//! Chunks hold buffers and vertex arrays on the device they were loaded with.
//! They are released by [`World::unload_chunk`] and [`World::unload_all`];
//! dropping a world that still holds chunks leaks them on the device.
//!
//! ## Performance Considerations
//!
//! - Chunk lookup is O(1) using a hash map keyed by world-space origin
//! - Meshing and upload are synchronous and run on the calling thread

use std::collections::HashMap;

use cgmath::{Point3, Vector3};
use noise::{NoiseFn, Perlin};

use crate::engine_state::{
    gpu_commands::{CommandQueue, GpuDevice},
    rendering::meshing::{build_visible_geometry, RenderPass},
    voxels::{
        block::block_side::BlockSide,
        chunk::{
            terrain::{ConfigError, TerrainConfig},
            Chunk, CHUNK_LENGTH, CHUNK_WIDTH,
        },
    },
};

/// Read-only access to the chunks that are currently loaded.
pub trait ChunkLookup {
    /// Returns the chunk whose world-space origin is `position`, if it is loaded.
    fn chunk_at(&self, position: Point3<i32>) -> Option<&Chunk>;

    /// Returns the origins of every loaded chunk.
    fn loaded_chunks(&self) -> Vec<Point3<i32>>;
}

/// A lookup with no chunks loaded. Meshing against it hides every horizontal
/// edge face.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoNeighbors;

impl ChunkLookup for NoNeighbors {
    fn chunk_at(&self, _position: Point3<i32>) -> Option<&Chunk> {
        None
    }

    fn loaded_chunks(&self) -> Vec<Point3<i32>> {
        Vec::new()
    }
}

impl ChunkLookup for HashMap<Point3<i32>, Chunk> {
    fn chunk_at(&self, position: Point3<i32>) -> Option<&Chunk> {
        self.get(&position)
    }

    fn loaded_chunks(&self) -> Vec<Point3<i32>> {
        let mut positions: Vec<Point3<i32>> = self.keys().copied().collect();
        positions.sort_by_key(|p| (p.x, p.y, p.z));
        positions
    }
}

/// A registry of loaded chunks sharing one terrain configuration and noise source.
///
/// # Examples
///
/// ```
/// use voxel_chunks::{ChunkLookup, HeadlessDevice, TerrainConfig, World};
/// use cgmath::Point3;
///
/// let mut device = HeadlessDevice::new();
/// let mut world = World::new(TerrainConfig::default(), 7).unwrap();
///
/// world.add_chunk_at(Point3::new(0, 0, 0), &mut device);
/// assert!(world.chunk_at(Point3::new(0, 0, 0)).is_some());
///
/// world.unload_all(&mut device);
/// assert_eq!(device.live_buffers(), 0);
/// ```
pub struct World {
    /// A mapping from chunk origins to chunk data.
    chunks: HashMap<Point3<i32>, Chunk>,
    config: TerrainConfig,
    noise: Box<dyn NoiseFn<f64, 2>>,
}

impl World {
    /// Creates an empty world whose terrain is shaped by Perlin noise.
    ///
    /// # Arguments
    /// * `config` - The terrain parameters every chunk is generated with
    /// * `seed` - Seed of the Perlin noise
    ///
    /// # Errors
    /// Returns the [`TerrainConfig::validate`] error if terrain would not fit in a chunk.
    pub fn new(config: TerrainConfig, seed: u32) -> Result<Self, ConfigError> {
        Self::with_noise(config, Box::new(Perlin::new(seed)))
    }

    /// Creates an empty world using an arbitrary noise source.
    ///
    /// The source must be deterministic and return values in `[-1, 1]`.
    ///
    /// # Errors
    /// Returns the [`TerrainConfig::validate`] error if terrain would not fit in a chunk.
    pub fn with_noise(
        config: TerrainConfig,
        noise: Box<dyn NoiseFn<f64, 2>>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(World {
            chunks: HashMap::new(),
            config,
            noise,
        })
    }

    /// The terrain configuration of this world.
    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    /// Iterates over every loaded chunk, in no particular order.
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    /// Mutable access to the chunk at `position`.
    ///
    /// Edited blocks are not re-meshed; call [`World::remesh_chunk`] afterwards.
    pub fn chunk_mut(&mut self, position: Point3<i32>) -> Option<&mut Chunk> {
        self.chunks.get_mut(&position)
    }

    /// Returns the origin of the chunk containing the world column `(world_x, world_z)`.
    pub fn chunk_position_for(world_x: i32, world_z: i32) -> Point3<i32> {
        Point3::new(
            world_x.div_euclid(CHUNK_LENGTH as i32) * CHUNK_LENGTH as i32,
            0,
            world_z.div_euclid(CHUNK_WIDTH as i32) * CHUNK_WIDTH as i32,
        )
    }

    /// Returns `true` if `position` is a valid chunk origin.
    pub fn is_chunk_aligned(position: Point3<i32>) -> bool {
        Self::chunk_position_for(position.x, position.z) == position
    }

    /// Loads a new chunk at `position` and runs its full pipeline.
    ///
    /// # Returns
    /// `true` if a chunk was added; `false` if one was already loaded there or
    /// the position is not a chunk origin.
    pub fn add_chunk_at(&mut self, position: Point3<i32>, device: &mut dyn GpuDevice) -> bool {
        if self.chunks.contains_key(&position) {
            return false;
        }
        if !Self::is_chunk_aligned(position) {
            log::warn!("Refusing to load chunk at unaligned position {:?}", position);
            return false;
        }

        let mut chunk = Chunk::new(position, device);
        if let Err(err) = chunk.gen_terrain(&*self.noise, &self.config) {
            log::error!("Failed to generate chunk at {:?}: {}", position, err);
            chunk.release(device);
            return false;
        }
        chunk.gen_visible_geometry(&*self, &self.config);
        chunk.update_terrain(device);

        log::info!("Loaded chunk at {:?}", position);
        self.chunks.insert(position, chunk);
        true
    }

    /// Rebuilds and re-uploads the geometry of the chunk at `position`.
    ///
    /// # Returns
    /// `false` if no chunk is loaded there.
    pub fn remesh_chunk(&mut self, position: Point3<i32>, device: &mut dyn GpuDevice) -> bool {
        let geometry = match self.chunks.get(&position) {
            Some(chunk) => build_visible_geometry(chunk, &*self, &self.config),
            None => return false,
        };

        match self.chunks.get_mut(&position) {
            Some(chunk) => {
                chunk.set_geometry(geometry);
                chunk.update_terrain(device);
                true
            }
            None => false,
        }
    }

    /// Re-meshes every loaded chunk sharing an edge with `position`.
    ///
    /// Call this after loading a chunk so its neighbours expose the faces that
    /// were hidden while it was missing.
    ///
    /// # Returns
    /// The number of chunks re-meshed.
    pub fn remesh_neighbors_of(&mut self, position: Point3<i32>, device: &mut dyn GpuDevice) -> usize {
        let mut remeshed = 0;
        for neighbor in Self::neighbor_positions(position) {
            if self.remesh_chunk(neighbor, device) {
                remeshed += 1;
            }
        }
        remeshed
    }

    /// Unloads the chunk at `position` and releases its GPU resources.
    ///
    /// # Returns
    /// `false` if no chunk is loaded there.
    pub fn unload_chunk(&mut self, position: Point3<i32>, device: &mut dyn GpuDevice) -> bool {
        match self.chunks.remove(&position) {
            Some(chunk) => {
                chunk.release(device);
                log::info!("Unloaded chunk at {:?}", position);
                true
            }
            None => false,
        }
    }

    /// Unloads every chunk and releases their GPU resources.
    ///
    /// # Returns
    /// The number of chunks unloaded.
    pub fn unload_all(&mut self, device: &mut dyn GpuDevice) -> usize {
        let unloaded = self.chunks.len();
        for (_, chunk) in self.chunks.drain() {
            chunk.release(device);
        }
        log::info!("Unloaded {} chunks", unloaded);
        unloaded
    }

    /// Records draws of `pass` for every loaded chunk that has geometry for it.
    ///
    /// # Returns
    /// The number of chunks drawn.
    pub fn render(&self, pass: RenderPass, command_queue: &mut CommandQueue) -> usize {
        let mut drawn = 0;
        for position in self.loaded_chunks() {
            if let Some(chunk) = self.chunks.get(&position) {
                if chunk.need_render(pass) {
                    chunk.render(pass, command_queue);
                    drawn += 1;
                }
            }
        }
        drawn
    }

    /// The origins of the four chunks sharing an edge with `position`.
    pub fn neighbor_positions(position: Point3<i32>) -> Vec<Point3<i32>> {
        BlockSide::all()
            .into_iter()
            .filter(|side| side.is_horizontal())
            .map(|side| {
                let offset = side.offset();
                position
                    + Vector3::new(
                        offset[0] * CHUNK_LENGTH as i32,
                        0,
                        offset[2] * CHUNK_WIDTH as i32,
                    )
            })
            .collect()
    }
}

impl Drop for World {
    fn drop(&mut self) {
        if !self.chunks.is_empty() {
            log::warn!(
                "World dropped with {} chunks still loaded; their GPU resources were not released",
                self.chunks.len()
            );
        }
    }
}

impl ChunkLookup for World {
    fn chunk_at(&self, position: Point3<i32>) -> Option<&Chunk> {
        self.chunks.get(&position)
    }

    fn loaded_chunks(&self) -> Vec<Point3<i32>> {
        self.chunks.loaded_chunks()
    }
}
