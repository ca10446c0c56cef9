/// Integration tests for keeping chunk geometry in sync with GPU buffers
/// These tests run against the recording HeadlessDevice
use cgmath::Point3;
use noise::Constant;
use voxel_chunks::*;

fn meshed_chunk(device: &mut HeadlessDevice, noise_value: f64) -> Chunk {
    let config = TerrainConfig::default();
    let mut chunk = Chunk::new(Point3::new(0, 0, 0), device);
    chunk.gen_terrain(&Constant::new(noise_value), &config).unwrap();
    chunk.gen_visible_geometry(&NoNeighbors, &config);
    chunk
}

#[test]
fn test_new_chunk_creates_buffers_for_both_passes() {
    let mut device = HeadlessDevice::new();
    let chunk = Chunk::new(Point3::new(0, 0, 0), &mut device);

    assert_eq!(device.live_buffers(), 4);
    assert_eq!(device.live_vertex_arrays(), 2);

    for pass in RenderPass::all() {
        let render_data = chunk.render_data(pass);
        assert_eq!(
            device.vertex_array(render_data.vertex_array),
            Some((render_data.vertex_buffer, render_data.index_buffer))
        );
        assert_eq!(
            device.buffer(render_data.vertex_buffer).unwrap().kind,
            BufferKind::VertexBuffer
        );
        assert_eq!(
            device.buffer(render_data.index_buffer).unwrap().kind,
            BufferKind::IndexBuffer
        );
    }
}

#[test]
fn test_update_uploads_exact_geometry_bytes() {
    let mut device = HeadlessDevice::new();
    let chunk = meshed_chunk(&mut device, -1.0);

    chunk.update_terrain(&mut device);

    assert_eq!(device.executions, 1);
    assert_eq!(device.allocations, 4);
    assert_eq!(device.pending_allocations(), 0);

    for pass in RenderPass::all() {
        let render_data = chunk.render_data(pass);
        let vertices = device.buffer(render_data.vertex_buffer).unwrap();
        let indices = device.buffer(render_data.index_buffer).unwrap();

        assert_eq!(vertices.data.as_slice(), render_data.geometry.vertex_bytes());
        assert_eq!(indices.data.as_slice(), render_data.geometry.index_bytes());
        assert_eq!(vertices.hint, Some(BufferUsageHint::Immutable));
        assert_eq!(indices.hint, Some(BufferUsageHint::Immutable));
    }
}

#[test]
fn test_update_skips_empty_passes() {
    let mut device = HeadlessDevice::new();
    // dry terrain, the water pass stays empty
    let chunk = meshed_chunk(&mut device, 0.5);

    chunk.update_terrain(&mut device);

    assert_eq!(device.executions, 1);
    assert_eq!(device.allocations, 2);
    let water = chunk.render_data(RenderPass::WATER);
    assert!(device.buffer(water.vertex_buffer).unwrap().data.is_empty());
    assert_eq!(device.buffer(water.index_buffer).unwrap().times_written, 0);
}

#[test]
fn test_update_of_empty_chunk_allocates_nothing() {
    let mut device = HeadlessDevice::new();
    let mut chunk = Chunk::new(Point3::new(0, 0, 0), &mut device);
    chunk.gen_visible_geometry(&NoNeighbors, &TerrainConfig::default());

    chunk.update_terrain(&mut device);

    assert_eq!(device.allocations, 0);
    assert!(!chunk.need_render(RenderPass::GEOMETRY));
    assert!(!chunk.need_render(RenderPass::WATER));
}

#[test]
fn test_need_render_follows_the_geometry() {
    let mut device = HeadlessDevice::new();

    let submerged = meshed_chunk(&mut device, -1.0);
    assert!(submerged.need_render(RenderPass::GEOMETRY));
    assert!(submerged.need_render(RenderPass::WATER));

    let dry = meshed_chunk(&mut device, 1.0);
    assert!(dry.need_render(RenderPass::GEOMETRY));
    assert!(!dry.need_render(RenderPass::WATER));
}

#[test]
fn test_render_records_bind_and_draw() {
    let mut device = HeadlessDevice::new();
    let chunk = meshed_chunk(&mut device, -1.0);
    chunk.update_terrain(&mut device);

    let mut commands = CommandQueue::new();
    chunk.render(RenderPass::WATER, &mut commands);

    let water = chunk.render_data(RenderPass::WATER);
    assert_eq!(
        commands.commands(),
        &[
            RenderCommand::BindVertexArray(water.vertex_array),
            RenderCommand::DrawIndexed {
                primitive: PrimitiveType::Triangles,
                start: 0,
                count: water.geometry.indices.len() as u32,
            },
        ]
    );
}

#[test]
fn test_reupload_replaces_buffer_contents() {
    let mut device = HeadlessDevice::new();
    let config = TerrainConfig::default();
    let mut chunk = meshed_chunk(&mut device, 1.0);
    chunk.update_terrain(&mut device);

    chunk.set_block_at(3, 120, 3, BlockType::DIRT);
    chunk.gen_visible_geometry(&NoNeighbors, &config);
    chunk.update_terrain(&mut device);

    let render_data = chunk.render_data(RenderPass::GEOMETRY);
    let vertices = device.buffer(render_data.vertex_buffer).unwrap();
    assert_eq!(vertices.times_written, 2);
    assert_eq!(vertices.data.as_slice(), render_data.geometry.vertex_bytes());
    assert_eq!(device.executions, 2);
}

#[test]
fn test_release_frees_every_gpu_resource() {
    let mut device = HeadlessDevice::new();
    let chunk = meshed_chunk(&mut device, -1.0);
    chunk.update_terrain(&mut device);

    chunk.release(&mut device);

    assert_eq!(device.live_buffers(), 0);
    assert_eq!(device.live_vertex_arrays(), 0);
}
