//! # Terrain Generation Module
//!
//! Fills a chunk's blocks from a 2D heightmap.
//!
//! ## Generation Steps
//!
//! 1. **Heightmap**: every column samples the noise source at a world-space
//!    coordinate, so neighbouring chunks line up without seams. The raw sample
//!    in `[-1, 1]` is mapped onto an integer height.
//! 2. **Water**: every column gets a water block at the water layer.
//! 3. **Land**: the block at the column height becomes dirt and everything
//!    beneath it becomes cobblestone. Columns that stay under the water layer
//!    keep their water block, producing submerged terrain.
//!
//! Output depends only on the noise source, the configuration and the chunk
//! position, never on the order other chunks were generated in.

use std::fmt;

use cgmath::Point3;
use noise::NoiseFn;
use serde::{Deserialize, Serialize};

use crate::engine_state::voxels::block::block_type::BlockType;

use super::{Chunk, CHUNK_HEIGHT, CHUNK_LENGTH, CHUNK_WIDTH};

/// The layer every column receives a water block at.
pub const WATER_HEIGHT: i32 = 60;
/// How far above the lowest terrain the highest terrain may reach.
pub const MAX_LAND_HEIGHT: i32 = 48;
/// How far below the water layer the lowest terrain sits.
pub const LAND_BELOW_WATER: i32 = 10;
/// Scaling factor applied to chunk-normalized coordinates when sampling noise.
pub const NOISE_FREQUENCY: f64 = 0.25;

/// Parameters of the heightmap terrain.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Layer holding the water surface
    pub water_height: i32,
    /// Height range the noise is mapped onto
    pub max_land_height: i32,
    /// Offset of the lowest terrain below the water surface
    pub land_below_water: i32,
    /// Noise frequency in chunks
    pub noise_frequency: f64,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        TerrainConfig {
            water_height: WATER_HEIGHT,
            max_land_height: MAX_LAND_HEIGHT,
            land_below_water: LAND_BELOW_WATER,
            noise_frequency: NOISE_FREQUENCY,
        }
    }
}

/// Errors produced while loading or validating a [`TerrainConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// The document was not valid JSON for a terrain config
    Parse(serde_json::Error),
    /// The tallest possible column would not fit inside a chunk
    TerrainTooTall {
        /// The tallest height a column or the water layer can reach
        max_height: i32,
    },
    /// The lowest possible column would sit below the bottom of a chunk
    NegativeTerrain {
        /// The lowest height a column or the water layer can reach
        min_height: i32,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(err) => write!(f, "invalid terrain config: {}", err),
            ConfigError::TerrainTooTall { max_height } => write!(
                f,
                "terrain can reach height {} but chunks are only {} blocks tall",
                max_height, CHUNK_HEIGHT
            ),
            ConfigError::NegativeTerrain { min_height } => {
                write!(f, "terrain can drop to height {}", min_height)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err)
    }
}

impl TerrainConfig {
    /// Parses and validates a config from JSON. Missing fields use the defaults.
    ///
    /// # Examples
    ///
    /// ```
    /// use voxel_chunks::TerrainConfig;
    ///
    /// let config = TerrainConfig::from_json_str(r#"{ "water_height": 40 }"#).unwrap();
    /// assert_eq!(config.water_height, 40);
    /// assert_eq!(config.max_land_height, 48);
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: TerrainConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// The lowest height a column can be assigned.
    pub fn min_height(&self) -> i32 {
        self.water_height - self.land_below_water
    }

    /// The highest height a column can be assigned.
    pub fn max_height(&self) -> i32 {
        self.min_height() + self.max_land_height
    }

    /// Checks that every possible column, and the water layer, fits in a chunk.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let max_height = self.max_height().max(self.water_height);
        if max_height >= CHUNK_HEIGHT as i32 {
            return Err(ConfigError::TerrainTooTall { max_height });
        }
        let min_height = self.min_height().min(self.water_height);
        if min_height < 0 {
            return Err(ConfigError::NegativeTerrain { min_height });
        }
        Ok(())
    }

    /// Maps a raw noise sample onto a column height.
    ///
    /// Samples are clamped to `[-1, 1]` first, so the result always lies in
    /// `min_height()..=max_height()`.
    pub fn height_from_noise(&self, sample: f64) -> i32 {
        let normalized = (sample.clamp(-1.0, 1.0) + 1.0) / 2.0;
        (normalized * self.max_land_height as f64).round() as i32 + self.min_height()
    }
}

/// Computes the heightmap of the chunk whose origin is `position`.
///
/// The result holds one height per column, indexed by `x + z * CHUNK_LENGTH`.
pub fn generate_height_map(
    position: Point3<i32>,
    noise: &dyn NoiseFn<f64, 2>,
    config: &TerrainConfig,
) -> Vec<i32> {
    let mut height_map = Vec::with_capacity(CHUNK_LENGTH * CHUNK_WIDTH);

    for z in 0..CHUNK_WIDTH {
        for x in 0..CHUNK_LENGTH {
            // Sampled in world space so the noise is continuous across chunks
            let x_offset =
                (position.x as f64 + x as f64) / CHUNK_LENGTH as f64 * config.noise_frequency;
            let z_offset =
                (position.z as f64 + z as f64) / CHUNK_WIDTH as f64 * config.noise_frequency;

            let sample = noise.get([x_offset, z_offset]);
            height_map.push(config.height_from_noise(sample));
        }
    }

    height_map
}

impl Chunk {
    /// Populates the blocks and heightmap of this chunk from its position.
    ///
    /// Any previous content is discarded first, so generating twice yields the
    /// same result as generating once.
    ///
    /// # Arguments
    /// * `noise` - A deterministic 2D noise source returning values in `[-1, 1]`
    /// * `config` - The terrain parameters
    ///
    /// # Errors
    /// Returns the [`TerrainConfig::validate`] error, leaving the chunk untouched,
    /// if a column or the water layer would fall outside the chunk.
    pub fn gen_terrain(
        &mut self,
        noise: &dyn NoiseFn<f64, 2>,
        config: &TerrainConfig,
    ) -> Result<(), ConfigError> {
        config.validate()?;

        self.blocks.clear();
        self.height_map = generate_height_map(self.position, noise, config);

        // validate() keeps every height and the water layer inside the chunk
        let water_height = config.water_height as usize;

        for z in 0..CHUNK_WIDTH {
            for x in 0..CHUNK_LENGTH {
                self.blocks.set(x, water_height, z, BlockType::WATER);
            }
        }

        for z in 0..CHUNK_WIDTH {
            for x in 0..CHUNK_LENGTH {
                let height = self.height_map[x + z * CHUNK_LENGTH] as usize;

                self.blocks.set(x, height, z, BlockType::DIRT);
                for y in 0..height {
                    self.blocks.set(x, y, z, BlockType::COBBLESTONE);
                }
            }
        }

        log::trace!("Generated terrain for chunk at {:?}", self.position);
        Ok(())
    }
}
