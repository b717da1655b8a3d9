//! Scene configuration for riverbed generation

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::atmosphere::BelowHorizon;
use crate::core::{Error, Result};
use crate::math::Falloff;
use crate::terrain::{ChannelParams, DigParams, RaiseParams, RockParams};

/// Terrain extents and resolution
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Extent along x
    pub width: f32,
    /// Extent along y (the channel runs along this axis)
    pub length: f32,
    /// Cells along (x, y)
    pub subdivisions: (usize, usize),
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            width: 20.0,
            length: 40.0,
            subdivisions: (38, 78), // 2 * extent - 2
        }
    }
}

/// Riverbed sculpting parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplacementConfig {
    pub min_depth: f32,
    pub max_depth: f32,
    pub dig_radius: f32,
    pub min_bank_height: f32,
    pub max_bank_height: f32,
    pub bank_radius: f32,
    pub align_radius: f32,
    /// Kernel shared by every proportional edit
    pub falloff: Falloff,
}

impl Default for DisplacementConfig {
    fn default() -> Self {
        Self {
            min_depth: 0.2,
            max_depth: 0.5,
            dig_radius: 2.5,
            min_bank_height: 0.0,
            max_bank_height: 0.2,
            bank_radius: 3.0,
            align_radius: 3.0,
            falloff: Falloff::Smooth,
        }
    }
}

impl DisplacementConfig {
    pub fn dig_params(&self) -> DigParams {
        DigParams {
            min_depth: self.min_depth,
            max_depth: self.max_depth,
            radius: self.dig_radius,
        }
    }

    /// Bank parameters for a terrain `width` wide around `centerline_x`
    pub fn raise_params(&self, width: f32, centerline_x: f32) -> RaiseParams {
        RaiseParams {
            min_height: self.min_bank_height,
            max_height: self.max_bank_height,
            radius: self.bank_radius,
            centerline_x,
            half_width: 0.5 * width,
        }
    }
}

/// Sky dome and environment map
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomeConfig {
    /// Dome radius; 0.75 x terrain length when unset
    pub radius: Option<f32>,
    /// Environment map; the fallback light is used when unset or unreadable
    pub hdri_path: Option<PathBuf>,
    pub below_horizon: BelowHorizon,
}

/// Complete configuration for one riverbed scene
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Seed for every random draw in the scene
    pub seed: u64,
    pub terrain: TerrainConfig,
    pub channel: ChannelParams,
    pub displacement: DisplacementConfig,
    pub dome: DomeConfig,
    pub rocks: RockParams,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            terrain: TerrainConfig::default(),
            channel: ChannelParams::default(),
            displacement: DisplacementConfig::default(),
            dome: DomeConfig::default(),
            rocks: RockParams::default(),
        }
    }
}

impl SceneConfig {
    /// Dome radius after applying the length-based default
    pub fn dome_radius(&self) -> f32 {
        self.dome.radius.unwrap_or(0.75 * self.terrain.length)
    }

    /// Reject configurations that would produce garbage geometry
    pub fn validate(&self) -> Result<()> {
        let t = &self.terrain;
        if !(t.width > 0.0) || !(t.length > 0.0) {
            return Err(Error::config(format!(
                "terrain extents must be positive, got {} x {}",
                t.width, t.length
            )));
        }
        if t.subdivisions.0 < 1 || t.subdivisions.1 < 1 {
            return Err(Error::config(format!(
                "subdivisions must be at least 1, got {:?}",
                t.subdivisions
            )));
        }

        self.channel.validate()?;

        let d = &self.displacement;
        d.dig_params().validate()?;
        d.raise_params(t.width, 0.0).validate()?;
        if !(d.align_radius > 0.0) {
            return Err(Error::config(format!(
                "align_radius must be positive, got {}",
                d.align_radius
            )));
        }

        let radius = self.dome_radius();
        if !(radius > 0.0) {
            return Err(Error::config(format!("dome radius must be positive, got {radius}")));
        }

        self.rocks.validate()
    }

    /// Read a JSON config; missing fields take their defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Write as pretty JSON, creating parent directories
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)?;
        Ok(())
    }
}
