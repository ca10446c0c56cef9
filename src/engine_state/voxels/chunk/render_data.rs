//! # Chunk Render Data
//!
//! GPU-side state of a chunk: for every render pass, the latest CPU geometry
//! plus the vertex buffer, index buffer and vertex array it is uploaded to.
//!
//! ## Synchronization
//!
//! Uploads are full-buffer, immutable replacements. [`Chunk::update_terrain`]
//! queues one allocation per non-empty list and flushes the batch before
//! returning, so a pass is never drawn from a half-written buffer.

use crate::engine_state::{
    gpu_commands::{
        BufferHandle, BufferKind, BufferUsageHint, CommandQueue, GpuDevice, PrimitiveType,
        VertexArrayHandle,
    },
    rendering::{
        meshing::{PassGeometry, RenderPass, RENDER_PASS_COUNT},
        vertex::VertexLayout,
    },
};

use super::Chunk;

/// Geometry and GPU handles of a single pass.
#[derive(Debug)]
pub struct RenderData {
    /// The geometry produced by the last meshing run
    pub geometry: PassGeometry,
    /// Buffer receiving `geometry.vertices`
    pub vertex_buffer: BufferHandle,
    /// Buffer receiving `geometry.indices`
    pub index_buffer: BufferHandle,
    /// Vertex array binding both buffers
    pub vertex_array: VertexArrayHandle,
}

impl RenderData {
    /// Creates the buffers and vertex array of one pass.
    pub fn new(device: &mut dyn GpuDevice, layout: &VertexLayout) -> Self {
        let vertex_buffer = device.create_buffer(BufferKind::VertexBuffer);
        let index_buffer = device.create_buffer(BufferKind::IndexBuffer);
        let vertex_array = device.create_vertex_array(layout, vertex_buffer, index_buffer);

        RenderData {
            geometry: PassGeometry::default(),
            vertex_buffer,
            index_buffer,
            vertex_array,
        }
    }

    /// Creates the render data for every pass.
    pub fn for_all_passes(device: &mut dyn GpuDevice) -> [RenderData; RENDER_PASS_COUNT] {
        let layout = VertexLayout::position_only();
        [
            RenderData::new(device, &layout),
            RenderData::new(device, &layout),
        ]
    }

    /// Releases the GPU resources of this pass.
    pub fn release(self, device: &mut dyn GpuDevice) {
        device.delete_vertex_array(self.vertex_array);
        device.delete_buffer(self.vertex_buffer);
        device.delete_buffer(self.index_buffer);
    }
}

impl Chunk {
    /// Uploads the current geometry of every pass to its GPU buffers.
    ///
    /// Lists that are empty are skipped, so no zero-sized allocation is ever
    /// issued. The batch is executed before this returns.
    pub fn update_terrain(&self, device: &mut dyn GpuDevice) {
        for (pass, render_data) in RenderPass::all().iter().zip(self.render_data.iter()) {
            let geometry = &render_data.geometry;

            if !geometry.vertices.is_empty() {
                device.allocate_buffer_data(
                    render_data.vertex_buffer,
                    geometry.vertex_bytes(),
                    BufferUsageHint::Immutable,
                );
            }

            if !geometry.indices.is_empty() {
                device.allocate_buffer_data(
                    render_data.index_buffer,
                    geometry.index_bytes(),
                    BufferUsageHint::Immutable,
                );
            }

            if geometry.has_geometry() {
                log::debug!(
                    "Uploading {:?} pass of chunk at {:?}: {} bytes of vertices, {} bytes of indices",
                    pass,
                    self.position,
                    geometry.vertex_bytes().len(),
                    geometry.index_bytes().len()
                );
            } else {
                log::trace!("Skipping empty {:?} pass of chunk at {:?}", pass, self.position);
            }
        }

        device.execute_immediate();
    }

    /// Returns `true` if `pass` has both vertices and indices to draw.
    pub fn need_render(&self, pass: RenderPass) -> bool {
        self.render_data[pass.index()].geometry.has_geometry()
    }

    /// Records the draw of one pass into `command_queue`.
    ///
    /// Binds the pass's vertex array and issues one indexed triangle draw over
    /// the whole index list. The geometry is assumed to have been uploaded with
    /// [`Chunk::update_terrain`].
    pub fn render(&self, pass: RenderPass, command_queue: &mut CommandQueue) {
        let render_data = &self.render_data[pass.index()];

        command_queue.add_bind_vertex_array(render_data.vertex_array);
        command_queue.add_draw_indexed(
            PrimitiveType::Triangles,
            0,
            render_data.geometry.indices.len() as u32,
        );
    }

    /// Releases the GPU resources of every pass. The block storage is freed
    /// when `self` is dropped.
    pub fn release(self, device: &mut dyn GpuDevice) {
        log::trace!("Releasing chunk at {:?}", self.position);
        let Chunk { render_data, .. } = self;
        for render_data in render_data {
            render_data.release(device);
        }
    }
}
