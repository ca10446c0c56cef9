//! # Buffer State Module
//!
//! This module provides the wgpu implementation of [`GpuDevice`]. It owns every
//! GPU buffer handed out to chunks, performs their immutable uploads, and
//! replays recorded [`CommandQueue`]s onto a render pass.
//!
//! ## Key Features
//!
//! * Buffers and vertex arrays are referenced through opaque handles
//! * Uploads are batched and executed synchronously on request
//! * Buffer usage analytics and memory tracking
//!
//! ## Architecture
//!
//! wgpu has no mutable-size buffers and no vertex array objects. A handle
//! therefore maps to an optional `wgpu::Buffer` that each allocation replaces
//! wholesale, and a vertex array is a record of its two buffers plus the layout
//! pipelines should be built with. Binding a vertex array sets both buffers on
//! the render pass.

use std::{collections::HashMap, ops::Range};

use wgpu::{util::DeviceExt, Buffer, Device, Queue};

use crate::engine_state::{
    gpu_commands::{
        BufferHandle, BufferKind, BufferUsageHint, CommandQueue, GpuDevice, RenderCommand,
        VertexArrayHandle,
    },
    rendering::vertex::VertexLayout,
};

/// Analytics data for a GPU buffer
///
/// Tracks memory allocation and write operations for a buffer
/// to help identify optimization opportunities.
#[derive(Debug, Default)]
struct BufferAnalytics {
    /// Memory currently allocated for the buffer in bytes
    pub allocated_memory: u64,
    /// Number of times the buffer has been allocated
    pub times_written: u64,
}

impl BufferAnalytics {
    /// Records an allocation that replaced the buffer's storage with `size` bytes.
    fn record_allocation(&mut self, size: usize) {
        self.allocated_memory = size as u64;
        self.times_written += 1;
    }
}

/// The wgpu usage flags of a buffer of `kind` allocated with `hint`.
///
/// Only buffers that may be rewritten in place get `COPY_DST`.
fn buffer_usages(kind: BufferKind, hint: BufferUsageHint) -> wgpu::BufferUsages {
    let usage = match kind {
        BufferKind::VertexBuffer => wgpu::BufferUsages::VERTEX,
        BufferKind::IndexBuffer => wgpu::BufferUsages::INDEX,
    };
    match hint {
        BufferUsageHint::Immutable => usage,
        BufferUsageHint::Dynamic => usage | wgpu::BufferUsages::COPY_DST,
    }
}

fn buffer_label(kind: BufferKind) -> &'static str {
    match kind {
        BufferKind::VertexBuffer => "Chunk Vertex Buffer",
        BufferKind::IndexBuffer => "Chunk Index Buffer",
    }
}

/// A render command after its vertex array has been resolved.
#[derive(Clone, Debug, PartialEq)]
enum EncodeStep {
    Bind(VertexArrayHandle),
    Draw(Range<u32>),
}

/// Resolves recorded commands into the steps to encode.
///
/// `bindable` reports whether a vertex array can be bound. Draws following a
/// bind that failed, or issued before any bind, are dropped.
fn plan_encode(
    commands: &[RenderCommand],
    mut bindable: impl FnMut(VertexArrayHandle) -> bool,
) -> Vec<EncodeStep> {
    let mut steps = Vec::with_capacity(commands.len());
    let mut bound = false;

    for command in commands {
        match *command {
            RenderCommand::BindVertexArray(handle) => {
                bound = bindable(handle);
                if bound {
                    steps.push(EncodeStep::Bind(handle));
                }
            }
            RenderCommand::DrawIndexed { start, count, .. } => {
                if bound {
                    steps.push(EncodeStep::Draw(start..start + count));
                }
            }
        }
    }

    steps
}

/// A buffer slot. `buffer` is `None` until the first allocation executes.
struct GpuBuffer {
    kind: BufferKind,
    buffer: Option<Buffer>,
}

/// The resources a vertex array binds.
struct VertexArray {
    layout: VertexLayout,
    vertex_buffer: BufferHandle,
    index_buffer: BufferHandle,
}

/// An allocation waiting for the next [`GpuDevice::execute_immediate`].
struct PendingAllocation {
    buffer: BufferHandle,
    data: Vec<u8>,
    hint: BufferUsageHint,
}

/// wgpu-backed manager for the buffers and vertex arrays of the chunk subsystem
///
/// # Examples
///
/// ```no_run
/// use voxel_chunks::{BufferState, Chunk, CommandQueue, RenderPass};
/// # fn frame(device: wgpu::Device, queue: wgpu::Queue, chunk: &Chunk, render_pass: &mut wgpu::RenderPass<'_>) {
/// let mut buffer_state = BufferState::new(device, queue);
///
/// chunk.update_terrain(&mut buffer_state);
///
/// let mut commands = CommandQueue::new();
/// chunk.render(RenderPass::GEOMETRY, &mut commands);
/// buffer_state.encode(&commands, render_pass);
/// # }
/// ```
pub struct BufferState {
    /// Reference to the GPU device
    pub device: Device,
    /// Reference to the GPU command queue
    pub queue: Queue,
    next_handle: u32,
    buffers: HashMap<BufferHandle, GpuBuffer>,
    vertex_arrays: HashMap<VertexArrayHandle, VertexArray>,
    pending: Vec<PendingAllocation>,
    buffer_analytics: HashMap<BufferHandle, BufferAnalytics>,
}

impl BufferState {
    /// Creates a new buffer state manager
    ///
    /// # Arguments
    ///
    /// * `device` - The GPU device buffers are created on
    /// * `queue` - The GPU command queue uploads are submitted to
    pub fn new(device: Device, queue: Queue) -> Self {
        Self {
            device,
            queue,
            next_handle: 0,
            buffers: HashMap::new(),
            vertex_arrays: HashMap::new(),
            pending: Vec::new(),
            buffer_analytics: HashMap::new(),
        }
    }

    /// Gets the wgpu buffer behind a handle, if it has been allocated
    pub fn get_buffer(&self, handle: BufferHandle) -> Option<&Buffer> {
        self.buffers
            .get(&handle)
            .and_then(|slot| slot.buffer.as_ref())
    }

    /// Gets the layout a vertex array was created with, for pipeline creation
    pub fn get_vertex_layout(&self, handle: VertexArrayHandle) -> Option<&VertexLayout> {
        self.vertex_arrays.get(&handle).map(|array| &array.layout)
    }

    /// Replays recorded render commands onto `render_pass`.
    ///
    /// The caller must have set a pipeline compatible with the vertex layout.
    /// Draws following the bind of a vertex array whose buffers were never
    /// allocated are skipped.
    pub fn encode(&self, command_queue: &CommandQueue, render_pass: &mut wgpu::RenderPass<'_>) {
        let steps = plan_encode(command_queue.commands(), |handle| {
            match self.vertex_arrays.get(&handle) {
                Some(array) => {
                    let uploaded = self.get_buffer(array.vertex_buffer).is_some()
                        && self.get_buffer(array.index_buffer).is_some();
                    if !uploaded {
                        log::warn!("Vertex array {:?} has no uploaded data", handle);
                    }
                    uploaded
                }
                None => {
                    log::warn!("Bind of unknown vertex array {:?} ignored", handle);
                    false
                }
            }
        });

        for step in steps {
            match step {
                EncodeStep::Bind(handle) => {
                    let Some(array) = self.vertex_arrays.get(&handle) else {
                        continue;
                    };
                    if let (Some(vertex_buffer), Some(index_buffer)) = (
                        self.get_buffer(array.vertex_buffer),
                        self.get_buffer(array.index_buffer),
                    ) {
                        render_pass.set_vertex_buffer(0, vertex_buffer.slice(..));
                        render_pass
                            .set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                    }
                }
                EncodeStep::Draw(indices) => render_pass.draw_indexed(indices, 0, 0..1),
            }
        }
    }

    /// Gets the total allocated memory across all buffers
    ///
    /// # Returns
    ///
    /// Total allocated memory in bytes
    pub fn get_total_allocated_memory(&self) -> u64 {
        self.buffer_analytics
            .values()
            .fold(0, |acc, buffer_analytics| acc + buffer_analytics.allocated_memory)
    }

    /// Gets the total number of executed allocations across all buffers
    pub fn get_total_writes(&self) -> u64 {
        self.buffer_analytics
            .values()
            .fold(0, |acc, buffer_analytics| acc + buffer_analytics.times_written)
    }

    fn next_handle(&mut self) -> u32 {
        self.next_handle += 1;
        self.next_handle
    }
}

impl GpuDevice for BufferState {
    fn create_buffer(&mut self, kind: BufferKind) -> BufferHandle {
        let handle = BufferHandle(self.next_handle());
        self.buffers.insert(handle, GpuBuffer { kind, buffer: None });
        self.buffer_analytics
            .insert(handle, BufferAnalytics::default());
        handle
    }

    fn create_vertex_array(
        &mut self,
        layout: &VertexLayout,
        vertex_buffer: BufferHandle,
        index_buffer: BufferHandle,
    ) -> VertexArrayHandle {
        let handle = VertexArrayHandle(self.next_handle());
        self.vertex_arrays.insert(
            handle,
            VertexArray {
                layout: layout.clone(),
                vertex_buffer,
                index_buffer,
            },
        );
        handle
    }

    fn allocate_buffer_data(&mut self, buffer: BufferHandle, data: &[u8], hint: BufferUsageHint) {
        self.pending.push(PendingAllocation {
            buffer,
            data: data.to_vec(),
            hint,
        });
    }

    fn execute_immediate(&mut self) {
        if self.pending.is_empty() {
            return;
        }

        for allocation in std::mem::take(&mut self.pending) {
            let Some(slot) = self.buffers.get_mut(&allocation.buffer) else {
                log::warn!("Allocation for unknown buffer {:?} ignored", allocation.buffer);
                continue;
            };

            let buffer = self
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(buffer_label(slot.kind)),
                    contents: &allocation.data,
                    usage: buffer_usages(slot.kind, allocation.hint),
                });

            if let Some(previous) = slot.buffer.replace(buffer) {
                previous.destroy();
            }

            self.buffer_analytics
                .entry(allocation.buffer)
                .or_default()
                .record_allocation(allocation.data.len());
        }

        self.queue.submit(std::iter::empty());
    }

    fn delete_buffer(&mut self, buffer: BufferHandle) {
        if let Some(slot) = self.buffers.remove(&buffer) {
            if let Some(buffer) = slot.buffer {
                buffer.destroy();
            }
        }
        self.buffer_analytics.remove(&buffer);
    }

    fn delete_vertex_array(&mut self, vertex_array: VertexArrayHandle) {
        self.vertex_arrays.remove(&vertex_array);
    }
}
