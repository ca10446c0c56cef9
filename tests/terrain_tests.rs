/// Integration tests for terrain generation
/// These tests validate the column layout, the water layer and determinism
use cgmath::Point3;
use noise::{Constant, Perlin};
use voxel_chunks::*;

fn generated_chunk(position: Point3<i32>, seed: u32, device: &mut HeadlessDevice) -> Chunk {
    let mut chunk = Chunk::new(position, device);
    chunk.gen_terrain(&Perlin::new(seed), &TerrainConfig::default()).unwrap();
    chunk
}

#[test]
fn test_terrain_is_deterministic() {
    let mut device = HeadlessDevice::new();
    let position = Point3::new(48, 0, -32);

    let first = generated_chunk(position, 11, &mut device);
    let second = generated_chunk(position, 11, &mut device);

    assert_eq!(first.height_map(), second.height_map());
    assert_eq!(first.blocks().as_bytes(), second.blocks().as_bytes());
}

#[test]
fn test_regenerating_terrain_is_idempotent() {
    let mut device = HeadlessDevice::new();
    let mut chunk = generated_chunk(Point3::new(0, 0, 0), 3, &mut device);
    let height_map = chunk.height_map().to_vec();
    let blocks = chunk.blocks().as_bytes().to_vec();

    chunk.gen_terrain(&Perlin::new(3), &TerrainConfig::default()).unwrap();

    assert_eq!(chunk.height_map(), height_map.as_slice());
    assert_eq!(chunk.blocks().as_bytes(), blocks.as_slice());
}

#[test]
fn test_terrain_is_independent_of_generation_order() {
    let mut device = HeadlessDevice::new();

    let mut world_a = World::new(TerrainConfig::default(), 5).unwrap();
    world_a.add_chunk_at(Point3::new(0, 0, 0), &mut device);
    world_a.add_chunk_at(Point3::new(16, 0, 0), &mut device);

    let mut world_b = World::new(TerrainConfig::default(), 5).unwrap();
    world_b.add_chunk_at(Point3::new(16, 0, 0), &mut device);
    world_b.add_chunk_at(Point3::new(0, 0, 0), &mut device);

    for position in [Point3::new(0, 0, 0), Point3::new(16, 0, 0)] {
        let a = world_a.chunk_at(position).unwrap();
        let b = world_b.chunk_at(position).unwrap();
        assert_eq!(a.blocks().as_bytes(), b.blocks().as_bytes());
    }
}

#[test]
fn test_every_column_is_dirt_over_cobblestone() {
    let mut device = HeadlessDevice::new();
    let config = TerrainConfig::default();
    let chunk = generated_chunk(Point3::new(-16, 0, 32), 99, &mut device);

    assert_eq!(chunk.height_map().len(), CHUNK_LENGTH * CHUNK_WIDTH);

    for z in 0..CHUNK_WIDTH {
        for x in 0..CHUNK_LENGTH {
            let height = chunk.height_at(x, z).unwrap();
            assert!(height >= config.min_height() && height <= config.max_height());
            let height = height as usize;

            assert_eq!(chunk.get_block_at(x, height, z).get_block_type(), BlockType::DIRT);
            for y in 0..height {
                assert_eq!(
                    chunk.get_block_at(x, y, z).get_block_type(),
                    BlockType::COBBLESTONE,
                    "column ({}, {}) at y={}",
                    x,
                    z,
                    y
                );
            }
            for y in height + 1..CHUNK_HEIGHT {
                let expected = if y == config.water_height as usize {
                    BlockType::WATER
                } else {
                    BlockType::AIR
                };
                assert_eq!(chunk.get_block_at(x, y, z).get_block_type(), expected);
            }
        }
    }
}

#[test]
fn test_submerged_columns_keep_their_water() {
    let mut device = HeadlessDevice::new();
    let mut chunk = Chunk::new(Point3::new(0, 0, 0), &mut device);
    // -1.0 maps to the lowest terrain, 50, ten blocks under the water layer
    chunk.gen_terrain(&Constant::new(-1.0), &TerrainConfig::default()).unwrap();

    for z in 0..CHUNK_WIDTH {
        for x in 0..CHUNK_LENGTH {
            assert_eq!(chunk.height_at(x, z), Some(50));
            assert_eq!(chunk.get_block_at(x, 60, z).get_block_type(), BlockType::WATER);
            assert_eq!(chunk.get_block_at(x, 55, z).get_block_type(), BlockType::AIR);
        }
    }
}

#[test]
fn test_land_above_the_water_layer_overwrites_it() {
    let mut device = HeadlessDevice::new();
    let mut chunk = Chunk::new(Point3::new(0, 0, 0), &mut device);
    // 1.0 maps to the highest terrain, 98
    chunk.gen_terrain(&Constant::new(1.0), &TerrainConfig::default()).unwrap();

    for z in 0..CHUNK_WIDTH {
        for x in 0..CHUNK_LENGTH {
            assert_eq!(chunk.height_at(x, z), Some(98));
            assert_eq!(
                chunk.get_block_at(x, 60, z).get_block_type(),
                BlockType::COBBLESTONE
            );
        }
    }
}

#[test]
fn test_column_at_the_water_layer_becomes_dirt() {
    let mut device = HeadlessDevice::new();
    let config = TerrainConfig {
        water_height: 60,
        land_below_water: 0,
        max_land_height: 0,
        ..TerrainConfig::default()
    };
    let mut chunk = Chunk::new(Point3::new(0, 0, 0), &mut device);
    chunk.gen_terrain(&Constant::new(0.3), &config).unwrap();

    assert_eq!(chunk.height_at(4, 4), Some(60));
    assert_eq!(chunk.get_block_at(4, 60, 4).get_block_type(), BlockType::DIRT);
}
