//! CPU-side geometry for one render pass of a chunk.

use crate::engine_state::{
    rendering::vertex::Vertex,
    voxels::block::{block_side::BlockSide, Block},
};

use super::face::{face_corners, FACE_INDICES, VERTICES_PER_FACE};

/// Number of vertices and indices reserved before a rebuild.
pub const RESERVED_GEOMETRY: usize = 16384;

/// The vertex and index lists of one pass.
///
/// Every face appends four vertices and six indices, so after any rebuild
/// `indices.len() == 6 * vertices.len() / 4`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PassGeometry {
    /// The vertex data for this pass
    pub vertices: Vec<Vertex>,
    /// Triangle list indices into `vertices`
    pub indices: Vec<u32>,
    /// Index of the first vertex of the next face
    pub current_index: u32,
}

impl PassGeometry {
    /// Creates empty geometry with room for a typical chunk.
    pub fn with_reserved_capacity() -> Self {
        PassGeometry {
            vertices: Vec::with_capacity(RESERVED_GEOMETRY),
            indices: Vec::with_capacity(RESERVED_GEOMETRY),
            current_index: 0,
        }
    }

    /// Appends one quad for `side` of `block` at the chunk-local `position`.
    ///
    /// # Panics
    /// Panics if the pass would hold more vertices than a `u32` index can address.
    pub fn add_face(&mut self, block: Block, position: [usize; 3], side: BlockSide) {
        let base = self.current_index;
        let next = base
            .checked_add(VERTICES_PER_FACE as u32)
            .expect("pass vertex count exceeds the index range");

        let normal = side.normal();
        let material = block.block_type as u32;
        self.vertices.extend(
            face_corners(position, side)
                .into_iter()
                .map(|corner| Vertex::new(corner, normal, material)),
        );
        self.indices
            .extend(FACE_INDICES.iter().map(|index| index + base));
        self.current_index = next;
    }

    /// Number of faces held by this pass.
    pub fn face_count(&self) -> usize {
        self.vertices.len() / VERTICES_PER_FACE
    }

    /// Returns `true` if both lists hold data.
    pub fn has_geometry(&self) -> bool {
        !self.vertices.is_empty() && !self.indices.is_empty()
    }

    /// The vertex list as raw bytes.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// The index list as raw bytes.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::block_type::BlockType;

    #[test]
    fn faces_advance_the_running_index() {
        let mut geometry = PassGeometry::default();
        let dirt = Block::new(BlockType::DIRT);
        geometry.add_face(dirt, [0, 0, 0], BlockSide::UP);
        geometry.add_face(dirt, [1, 0, 0], BlockSide::LEFT);

        assert_eq!(geometry.current_index, 8);
        assert_eq!(geometry.face_count(), 2);
        assert_eq!(geometry.indices, vec![0, 1, 2, 2, 3, 0, 4, 5, 6, 6, 7, 4]);
        assert!(geometry
            .vertices
            .iter()
            .all(|v| v.material == BlockType::DIRT as u32));
        assert_eq!(geometry.vertices[4].normal, [-1.0, 0.0, 0.0]);
    }

    #[test]
    fn byte_views_cover_every_element() {
        let mut geometry = PassGeometry::default();
        geometry.add_face(Block::new(BlockType::COBBLESTONE), [3, 4, 5], BlockSide::BACK);
        assert_eq!(geometry.vertex_bytes().len(), 4 * std::mem::size_of::<Vertex>());
        assert_eq!(geometry.index_bytes().len(), 6 * std::mem::size_of::<u32>());
    }

    #[test]
    fn empty_geometry_has_nothing_to_draw() {
        assert!(!PassGeometry::with_reserved_capacity().has_geometry());
    }
}
