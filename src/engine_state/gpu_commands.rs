//! # GPU Command Interface
//!
//! The narrow set of GPU operations the chunk subsystem depends on. Chunks never
//! talk to a graphics API directly; they create buffers and vertex arrays through
//! a [`GpuDevice`], queue uploads into an immediate batch that is flushed
//! synchronously, and record draws into a [`CommandQueue`] that the backend
//! replays later.
//!
//! ## Backends
//!
//! * [`BufferState`](crate::engine_state::buffer_state::BufferState) - wgpu-backed device
//! * [`HeadlessDevice`] - records every operation without touching a GPU

use std::collections::HashMap;

use crate::engine_state::rendering::vertex::VertexLayout;

/// Opaque handle to a GPU buffer owned by a [`GpuDevice`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub u32);

/// Opaque handle to a vertex array (a vertex buffer, an index buffer and a layout).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct VertexArrayHandle(pub u32);

/// What a buffer is bound as.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BufferKind {
    /// Per-vertex attribute data
    VertexBuffer,
    /// Triangle list indices
    IndexBuffer,
}

/// How often the contents of an allocated buffer are expected to change.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BufferUsageHint {
    /// Written once at allocation and never updated in place
    Immutable,
    /// May be rewritten after allocation
    Dynamic,
}

/// Primitive topology of a draw call.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    /// Every three indices form one triangle
    Triangles,
}

/// A single recorded render command.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RenderCommand {
    /// Makes a vertex array current for the following draws
    BindVertexArray(VertexArrayHandle),
    /// Draws `count` indices of the bound vertex array starting at `start`
    DrawIndexed {
        /// Topology of the draw
        primitive: PrimitiveType,
        /// First index to draw
        start: u32,
        /// Number of indices to draw
        count: u32,
    },
}

/// An ordered list of render commands, replayed by the backend once per frame.
#[derive(Debug, Default)]
pub struct CommandQueue {
    commands: Vec<RenderCommand>,
}

impl CommandQueue {
    /// Creates an empty command queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a vertex array bind.
    pub fn add_bind_vertex_array(&mut self, vertex_array: VertexArrayHandle) {
        self.commands
            .push(RenderCommand::BindVertexArray(vertex_array));
    }

    /// Records an indexed draw call.
    pub fn add_draw_indexed(&mut self, primitive: PrimitiveType, start: u32, count: u32) {
        self.commands.push(RenderCommand::DrawIndexed {
            primitive,
            start,
            count,
        });
    }

    /// The recorded commands in submission order.
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Number of draw calls recorded so far.
    pub fn draw_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, RenderCommand::DrawIndexed { .. }))
            .count()
    }

    /// Drops every recorded command, keeping the allocation for the next frame.
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

/// The GPU resource operations consumed by chunks.
///
/// Failures inside the backend are the backend's to report; none of these
/// operations return errors to the caller.
pub trait GpuDevice {
    /// Creates an empty buffer of the given kind.
    fn create_buffer(&mut self, kind: BufferKind) -> BufferHandle;

    /// Creates a vertex array binding `vertex_buffer` and `index_buffer` with `layout`.
    fn create_vertex_array(
        &mut self,
        layout: &VertexLayout,
        vertex_buffer: BufferHandle,
        index_buffer: BufferHandle,
    ) -> VertexArrayHandle;

    /// Queues a full replacement of `buffer`'s storage with `data`.
    ///
    /// Nothing reaches the GPU until [`GpuDevice::execute_immediate`] runs.
    fn allocate_buffer_data(&mut self, buffer: BufferHandle, data: &[u8], hint: BufferUsageHint);

    /// Submits every queued allocation and returns once they have been issued.
    fn execute_immediate(&mut self);

    /// Releases a buffer.
    fn delete_buffer(&mut self, buffer: BufferHandle);

    /// Releases a vertex array. The buffers it references are not released.
    fn delete_vertex_array(&mut self, vertex_array: VertexArrayHandle);
}

/// Contents of a buffer as seen by a [`HeadlessDevice`].
#[derive(Debug, Clone)]
pub struct HeadlessBuffer {
    /// What the buffer was created as
    pub kind: BufferKind,
    /// Bytes of the last executed allocation, empty until one runs
    pub data: Vec<u8>,
    /// Usage hint of the last executed allocation
    pub hint: Option<BufferUsageHint>,
    /// Number of executed allocations
    pub times_written: u64,
}

/// A [`GpuDevice`] that keeps everything in memory.
///
/// Used when no GPU adapter is available and to observe exactly which
/// operations a chunk issues.
#[derive(Debug, Default)]
pub struct HeadlessDevice {
    next_handle: u32,
    buffers: HashMap<BufferHandle, HeadlessBuffer>,
    vertex_arrays: HashMap<VertexArrayHandle, (BufferHandle, BufferHandle)>,
    pending: Vec<(BufferHandle, Vec<u8>, BufferUsageHint)>,
    /// Number of `execute_immediate` calls
    pub executions: u64,
    /// Total number of allocations issued across all executions
    pub allocations: u64,
}

impl HeadlessDevice {
    /// Creates a device with no resources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a live buffer.
    pub fn buffer(&self, handle: BufferHandle) -> Option<&HeadlessBuffer> {
        self.buffers.get(&handle)
    }

    /// Looks up the buffers referenced by a live vertex array.
    pub fn vertex_array(&self, handle: VertexArrayHandle) -> Option<(BufferHandle, BufferHandle)> {
        self.vertex_arrays.get(&handle).copied()
    }

    /// Number of buffers that have not been deleted.
    pub fn live_buffers(&self) -> usize {
        self.buffers.len()
    }

    /// Number of vertex arrays that have not been deleted.
    pub fn live_vertex_arrays(&self) -> usize {
        self.vertex_arrays.len()
    }

    /// Number of allocations waiting for the next execution.
    pub fn pending_allocations(&self) -> usize {
        self.pending.len()
    }

    fn next_handle(&mut self) -> u32 {
        self.next_handle += 1;
        self.next_handle
    }
}

impl GpuDevice for HeadlessDevice {
    fn create_buffer(&mut self, kind: BufferKind) -> BufferHandle {
        let handle = BufferHandle(self.next_handle());
        self.buffers.insert(
            handle,
            HeadlessBuffer {
                kind,
                data: Vec::new(),
                hint: None,
                times_written: 0,
            },
        );
        handle
    }

    fn create_vertex_array(
        &mut self,
        _layout: &VertexLayout,
        vertex_buffer: BufferHandle,
        index_buffer: BufferHandle,
    ) -> VertexArrayHandle {
        let handle = VertexArrayHandle(self.next_handle());
        self.vertex_arrays
            .insert(handle, (vertex_buffer, index_buffer));
        handle
    }

    fn allocate_buffer_data(&mut self, buffer: BufferHandle, data: &[u8], hint: BufferUsageHint) {
        self.pending.push((buffer, data.to_vec(), hint));
    }

    fn execute_immediate(&mut self) {
        self.executions += 1;
        for (handle, data, hint) in self.pending.drain(..) {
            match self.buffers.get_mut(&handle) {
                Some(buffer) => {
                    buffer.data = data;
                    buffer.hint = Some(hint);
                    buffer.times_written += 1;
                    self.allocations += 1;
                }
                None => log::warn!("Allocation for unknown buffer {:?} ignored", handle),
            }
        }
    }

    fn delete_buffer(&mut self, buffer: BufferHandle) {
        self.buffers.remove(&buffer);
    }

    fn delete_vertex_array(&mut self, vertex_array: VertexArrayHandle) {
        self.vertex_arrays.remove(&vertex_array);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocations_wait_for_execution() {
        let mut device = HeadlessDevice::new();
        let buffer = device.create_buffer(BufferKind::VertexBuffer);

        device.allocate_buffer_data(buffer, &[1, 2, 3], BufferUsageHint::Immutable);
        assert!(device.buffer(buffer).unwrap().data.is_empty());
        assert_eq!(device.pending_allocations(), 1);

        device.execute_immediate();
        let stored = device.buffer(buffer).unwrap();
        assert_eq!(stored.data, vec![1, 2, 3]);
        assert_eq!(stored.hint, Some(BufferUsageHint::Immutable));
        assert_eq!(device.pending_allocations(), 0);
    }

    #[test]
    fn later_allocations_replace_earlier_ones() {
        let mut device = HeadlessDevice::new();
        let buffer = device.create_buffer(BufferKind::IndexBuffer);

        device.allocate_buffer_data(buffer, &[1, 2], BufferUsageHint::Immutable);
        device.execute_immediate();
        device.allocate_buffer_data(buffer, &[9], BufferUsageHint::Dynamic);
        device.execute_immediate();

        let stored = device.buffer(buffer).unwrap();
        assert_eq!(stored.data, vec![9]);
        assert_eq!(stored.hint, Some(BufferUsageHint::Dynamic));
        assert_eq!(stored.times_written, 2);
        assert_eq!(device.allocations, 2);
    }

    #[test]
    fn deleting_releases_resources() {
        let mut device = HeadlessDevice::new();
        let vbo = device.create_buffer(BufferKind::VertexBuffer);
        let ibo = device.create_buffer(BufferKind::IndexBuffer);
        let vao = device.create_vertex_array(&VertexLayout::position_only(), vbo, ibo);
        assert_eq!(device.vertex_array(vao), Some((vbo, ibo)));

        device.delete_vertex_array(vao);
        device.delete_buffer(vbo);
        device.delete_buffer(ibo);
        assert_eq!(device.live_buffers(), 0);
        assert_eq!(device.live_vertex_arrays(), 0);
    }

    #[test]
    fn command_queue_counts_draws() {
        let mut queue = CommandQueue::new();
        queue.add_bind_vertex_array(VertexArrayHandle(7));
        queue.add_draw_indexed(PrimitiveType::Triangles, 0, 36);
        assert_eq!(queue.draw_count(), 1);
        assert_eq!(queue.commands()[0], RenderCommand::BindVertexArray(VertexArrayHandle(7)));

        queue.clear();
        assert!(queue.commands().is_empty());
    }
}
