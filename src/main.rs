//! # Voxel Chunks Demo
//!
//! Loads a small block of chunks headlessly and reports what would be drawn.
//! Uses a wgpu device when an adapter is available and the recording backend
//! otherwise.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=debug cargo run --release
//! ```

use cgmath::Point3;
use log::{error, info};
use voxel_chunks::{
    BufferState, CommandQueue, GpuDevice, HeadlessDevice, RenderPass, TerrainConfig, World,
    CHUNK_LENGTH, CHUNK_WIDTH,
};

/// Chunks loaded along each horizontal axis.
const DEMO_EXTENT: i32 = 3;
/// Seed of the terrain noise.
const DEMO_SEED: u32 = 2017;

async fn request_device() -> Option<(wgpu::Device, wgpu::Queue)> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
    let adapter = match instance
        .request_adapter(&wgpu::RequestAdapterOptions::default())
        .await
    {
        Ok(adapter) => adapter,
        Err(err) => {
            error!("No graphics adapter available: {}", err);
            return None;
        }
    };
    info!("Using adapter {:?}", adapter.get_info().name);

    match adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("Voxel Chunks Device"),
            ..Default::default()
        })
        .await
    {
        Ok(device_and_queue) => Some(device_and_queue),
        Err(err) => {
            error!("Failed to create device: {}", err);
            None
        }
    }
}

fn load_world(world: &mut World, device: &mut dyn GpuDevice) {
    let positions: Vec<Point3<i32>> = (0..DEMO_EXTENT)
        .flat_map(|cz| {
            (0..DEMO_EXTENT).map(move |cx| {
                Point3::new(cx * CHUNK_LENGTH as i32, 0, cz * CHUNK_WIDTH as i32)
            })
        })
        .collect();

    for &position in &positions {
        world.add_chunk_at(position, device);
    }

    // Every chunk was meshed before some of its neighbours existed.
    for &position in &positions {
        world.remesh_chunk(position, device);
    }

    for pass in RenderPass::all() {
        let faces: usize = world
            .chunks()
            .map(|chunk| chunk.geometry(pass).face_count())
            .sum();
        info!("{:?} pass: {} faces", pass, faces);
    }

    let mut commands = CommandQueue::new();
    for pass in RenderPass::all() {
        let drawn = world.render(pass, &mut commands);
        info!("{:?} pass: {} chunks drawn", pass, drawn);
    }
    info!("Recorded {} commands", commands.commands().len());
}

/// Logs the vertex buffer layout a pipeline drawing the chunks must be built with.
fn log_vertex_layout(world: &World, buffer_state: &BufferState) {
    let Some(chunk) = world.chunks().next() else {
        return;
    };
    let vertex_array = chunk.render_data(RenderPass::GEOMETRY).vertex_array;

    if let Some(layout) = buffer_state.get_vertex_layout(vertex_array) {
        let desc = layout.desc();
        info!(
            "Chunk vertex layout: stride {} bytes, {} attributes",
            desc.array_stride,
            desc.attributes.len()
        );
    }
}

fn main() {
    voxel_chunks::init_logging();
    info!("Logger initialized");

    let mut world = match World::new(TerrainConfig::default(), DEMO_SEED) {
        Ok(world) => world,
        Err(err) => {
            error!("{}", err);
            return;
        }
    };

    match pollster::block_on(request_device()) {
        Some((device, queue)) => {
            let mut buffer_state = BufferState::new(device, queue);
            load_world(&mut world, &mut buffer_state);
            log_vertex_layout(&world, &buffer_state);
            info!(
                "GPU memory allocated: {} bytes over {} writes",
                buffer_state.get_total_allocated_memory(),
                buffer_state.get_total_writes()
            );
            world.unload_all(&mut buffer_state);
        }
        None => {
            let mut headless = HeadlessDevice::new();
            load_world(&mut world, &mut headless);
            info!(
                "Headless device: {} executions, {} allocations",
                headless.executions, headless.allocations
            );
            world.unload_all(&mut headless);
        }
    }
}
