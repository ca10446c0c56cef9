//! Per-voxel face culling.
//!
//! A [`MeshBuilder`] walks a chunk column by column and asks a
//! [`FaceEmissionPolicy`] which voxels take part in a pass and which of their
//! faces are visible. Every visible face becomes one quad. Faces are never
//! merged.

use std::ops::Range;

use cgmath::Vector3;

use crate::engine_state::voxels::{
    block::{block_side::BlockSide, block_type::BlockType},
    chunk::{block_grid::in_bounds, Chunk, CHUNK_HEIGHT, CHUNK_LENGTH, CHUNK_WIDTH},
    world::ChunkLookup,
};

use super::{pass_geometry::PassGeometry, RenderPass};

/// Decides which faces of which voxels a pass emits.
pub trait FaceEmissionPolicy {
    /// The pass the emitted geometry belongs to.
    fn pass(&self) -> RenderPass;

    /// The horizontal layers that can hold participating voxels.
    fn layers(&self) -> Range<usize>;

    /// The sides tested for every participating voxel.
    fn sides(&self) -> &[BlockSide];

    /// Returns `true` if the voxel at the local position takes part in this pass.
    fn participates(&self, chunk: &Chunk, x: usize, y: usize, z: usize) -> bool;

    /// Returns `true` if `side` of a participating voxel should be emitted.
    fn face_visible(
        &self,
        chunk: &Chunk,
        neighbors: &dyn ChunkLookup,
        position: [usize; 3],
        side: BlockSide,
    ) -> bool;
}

/// Emits every side of a solid voxel that looks into open space.
pub struct OpaquePolicy;

const ALL_SIDES: [BlockSide; 6] = BlockSide::all();

impl FaceEmissionPolicy for OpaquePolicy {
    fn pass(&self) -> RenderPass {
        RenderPass::GEOMETRY
    }

    fn layers(&self) -> Range<usize> {
        0..CHUNK_HEIGHT
    }

    fn sides(&self) -> &[BlockSide] {
        &ALL_SIDES
    }

    fn participates(&self, chunk: &Chunk, x: usize, y: usize, z: usize) -> bool {
        !chunk.is_translucent(x, y, z)
    }

    fn face_visible(
        &self,
        chunk: &Chunk,
        neighbors: &dyn ChunkLookup,
        position: [usize; 3],
        side: BlockSide,
    ) -> bool {
        is_neighbor_open(chunk, neighbors, position, side)
    }
}

/// Emits the top surface of every water block left on the water layer.
///
/// Water sides are never emitted.
pub struct WaterSurfacePolicy {
    /// The layer terrain generation placed water on
    pub water_height: usize,
}

impl FaceEmissionPolicy for WaterSurfacePolicy {
    fn pass(&self) -> RenderPass {
        RenderPass::WATER
    }

    fn layers(&self) -> Range<usize> {
        let water_height = self.water_height.min(CHUNK_HEIGHT);
        water_height..(water_height + 1).min(CHUNK_HEIGHT)
    }

    fn sides(&self) -> &[BlockSide] {
        &[BlockSide::UP]
    }

    fn participates(&self, chunk: &Chunk, x: usize, y: usize, z: usize) -> bool {
        chunk.get_block_at(x, y, z).get_block_type() == BlockType::WATER
    }

    fn face_visible(
        &self,
        _chunk: &Chunk,
        _neighbors: &dyn ChunkLookup,
        _position: [usize; 3],
        _side: BlockSide,
    ) -> bool {
        true
    }
}

/// Determines whether the space on `side` of the voxel at `position` is open.
///
/// Inside the chunk this is the translucency of the neighbouring voxel. Above
/// the top and below the bottom of the chunk the space is always open. Across a
/// horizontal edge the adjacent chunk is looked up; if it is not loaded the
/// space counts as closed and the face is left out until the chunk is re-meshed.
pub fn is_neighbor_open(
    chunk: &Chunk,
    neighbors: &dyn ChunkLookup,
    position: [usize; 3],
    side: BlockSide,
) -> bool {
    let offset = side.offset();
    let nx = position[0] as i32 + offset[0];
    let ny = position[1] as i32 + offset[1];
    let nz = position[2] as i32 + offset[2];

    if in_bounds(nx, ny, nz) {
        return chunk.is_translucent(nx as usize, ny as usize, nz as usize);
    }

    if !side.is_horizontal() {
        return true;
    }

    let neighbor_position = chunk.position()
        + Vector3::new(
            offset[0] * CHUNK_LENGTH as i32,
            0,
            offset[2] * CHUNK_WIDTH as i32,
        );

    match neighbors.chunk_at(neighbor_position) {
        Some(neighbor) => neighbor.is_translucent(
            nx.rem_euclid(CHUNK_LENGTH as i32) as usize,
            ny as usize,
            nz.rem_euclid(CHUNK_WIDTH as i32) as usize,
        ),
        None => false,
    }
}

/// Walks a chunk and collects the faces a policy selects.
pub struct MeshBuilder<'a> {
    chunk: &'a Chunk,
    neighbors: &'a dyn ChunkLookup,
}

impl<'a> MeshBuilder<'a> {
    /// Creates a builder for `chunk`, resolving boundary faces through `neighbors`.
    pub fn new(chunk: &'a Chunk, neighbors: &'a dyn ChunkLookup) -> Self {
        MeshBuilder { chunk, neighbors }
    }

    /// Builds a fresh geometry for one pass.
    pub fn build<P: FaceEmissionPolicy + ?Sized>(&self, policy: &P) -> PassGeometry {
        let mut geometry = PassGeometry::with_reserved_capacity();
        let layers = policy.layers();

        for z in 0..CHUNK_WIDTH {
            for x in 0..CHUNK_LENGTH {
                for y in layers.clone() {
                    if !policy.participates(self.chunk, x, y, z) {
                        continue;
                    }

                    let block = self.chunk.get_block_at(x, y, z);
                    for &side in policy.sides() {
                        if policy.face_visible(self.chunk, self.neighbors, [x, y, z], side) {
                            geometry.add_face(block, [x, y, z], side);
                        }
                    }
                }
            }
        }

        geometry
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Point3;

    use super::*;
    use crate::engine_state::{gpu_commands::HeadlessDevice, voxels::world::NoNeighbors};

    #[test]
    fn vertical_edges_are_always_open() {
        let mut device = HeadlessDevice::new();
        let chunk = Chunk::new(Point3::new(0, 0, 0), &mut device);

        assert!(is_neighbor_open(&chunk, &NoNeighbors, [4, 0, 4], BlockSide::DOWN));
        assert!(is_neighbor_open(
            &chunk,
            &NoNeighbors,
            [4, CHUNK_HEIGHT - 1, 4],
            BlockSide::UP
        ));
    }

    #[test]
    fn unloaded_neighbors_are_closed() {
        let mut device = HeadlessDevice::new();
        let chunk = Chunk::new(Point3::new(0, 0, 0), &mut device);

        assert!(!is_neighbor_open(&chunk, &NoNeighbors, [0, 5, 5], BlockSide::LEFT));
        assert!(!is_neighbor_open(
            &chunk,
            &NoNeighbors,
            [5, 5, CHUNK_WIDTH - 1],
            BlockSide::FRONT
        ));
        // interior air stays open
        assert!(is_neighbor_open(&chunk, &NoNeighbors, [5, 5, 5], BlockSide::RIGHT));
    }

    #[test]
    fn water_policy_covers_one_layer() {
        let policy = WaterSurfacePolicy { water_height: 60 };
        assert_eq!(policy.layers(), 60..61);
        assert_eq!(policy.sides(), &[BlockSide::UP]);

        let above = WaterSurfacePolicy {
            water_height: CHUNK_HEIGHT + 4,
        };
        assert!(above.layers().is_empty());
    }

    #[test]
    fn water_is_excluded_from_the_opaque_pass() {
        let mut device = HeadlessDevice::new();
        let mut chunk = Chunk::new(Point3::new(0, 0, 0), &mut device);
        chunk.set_block_at(2, 60, 2, BlockType::WATER);

        let builder = MeshBuilder::new(&chunk, &NoNeighbors);
        assert_eq!(builder.build(&OpaquePolicy).face_count(), 0);
        assert_eq!(
            builder
                .build(&WaterSurfacePolicy { water_height: 60 })
                .face_count(),
            1
        );
    }
}
