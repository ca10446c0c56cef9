//! Vertex data structures and layouts for voxel rendering.
//!
//! This module defines the vertex format emitted by the mesher and the layout
//! vertex arrays are created with.

/// A vertex in the voxel rendering pipeline.
///
/// # Memory Layout
/// - Position: [f32; 4] (16 bytes), chunk-local, `w` always 1.0
/// - Normal: [f32; 3] (12 bytes)
/// - Material: u32 (4 bytes)
///
/// Total size: 32 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Homogeneous position in chunk-local space
    pub position: [f32; 4],
    /// Outward normal of the face this vertex belongs to
    pub normal: [f32; 3],
    /// Material id of the block the face belongs to
    pub material: u32,
}

impl Vertex {
    /// Creates a new vertex.
    ///
    /// # Arguments
    /// * `position` - Chunk-local position of the vertex
    /// * `normal` - Face normal
    /// * `material` - Block material id
    pub fn new(position: [f32; 3], normal: [f32; 3], material: u32) -> Self {
        Vertex {
            position: [position[0], position[1], position[2], 1.0],
            normal,
            material,
        }
    }
}

/// Describes how vertex arrays read the vertex buffer.
///
/// Only the position attribute is part of the structural layout; normal and
/// material travel in the same record and are read by shaders that opt in.
#[derive(Clone, Debug, PartialEq)]
pub struct VertexLayout {
    /// Bytes between consecutive vertices
    pub array_stride: wgpu::BufferAddress,
    /// Attributes read from each vertex
    pub attributes: Vec<wgpu::VertexAttribute>,
}

impl VertexLayout {
    /// The layout chunks create their vertex arrays with: a single
    /// 4-component float position at location 0.
    pub fn position_only() -> Self {
        VertexLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            attributes: vec![wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x4,
            }],
        }
    }

    /// Returns the `wgpu` vertex buffer layout for the shader pipeline.
    ///
    /// # Shader Attributes
    /// - `location = 0`: position (vec4<f32>)
    pub fn desc(&self) -> wgpu::VertexBufferLayout<'_> {
        wgpu::VertexBufferLayout {
            array_stride: self.array_stride,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &self.attributes,
        }
    }
}
