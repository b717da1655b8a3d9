//! Riverbed scene pipeline.
//!
//! [`RiverScene::generate`] runs every stage from one [`SceneConfig`]:
//! 1. Waterlines (left and right bank curves)
//! 2. Terrain grid, bed/bank classification
//! 3. Digging, bank raising, perimeter alignment
//! 4. Water plane trimmed to the channel
//! 5. Rocks on the bed, sun light from the environment map
//! 6. Terrain, water and rocks sunk onto the dome floor

pub mod config;

pub use config::{DisplacementConfig, DomeConfig, SceneConfig, TerrainConfig};

use glam::Vec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::atmosphere::{floor_z, EnvironmentLight, SunPlacement};
use crate::core::Result;
use crate::terrain::{
    classify, dig_riverbed, raise_riverbank, scatter_rocks, trim, AlignReport, BoundaryAligner, Channel,
    FalloffDisplacer, MeshData, RegionWarning, RockPlacement, TerrainGrid, TrimReport, WaterlineGenerator,
};

/// Summary of one generated scene
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SceneReport {
    pub seed: u64,
    pub terrain_vertices: usize,
    pub terrain_faces: usize,
    pub bed_vertices: usize,
    pub bank_vertices: usize,
    pub on_boundary_vertices: usize,
    pub region_warning: Option<RegionWarning>,
    pub waterline_crossings: usize,
    /// Deepest bed elevation before sinking onto the dome floor
    pub bed_min_z: Option<f32>,
    /// Highest bank elevation before sinking onto the dome floor
    pub bank_max_z: Option<f32>,
    /// Largest ring offset from the reference after alignment
    pub ring_max_offset: f32,
    pub align: AlignReport,
    pub water: TrimReport,
    pub rocks: usize,
    pub dome_radius: f32,
    pub floor_z: f32,
    pub fallback_light: bool,
    pub sun: SunPlacement,
}

/// Everything a host needs to build the scene
#[derive(Clone, Debug, Serialize)]
pub struct SceneExport<'a> {
    pub report: &'a SceneReport,
    pub channel: &'a Channel,
    pub terrain: MeshData,
    pub water: MeshData,
    pub rocks: &'a [RockPlacement],
    pub light: &'a EnvironmentLight,
}

/// A generated riverbed with its water, rocks and light
#[derive(Clone, Debug)]
pub struct RiverScene {
    pub channel: Channel,
    pub terrain: TerrainGrid,
    pub water: TerrainGrid,
    pub rocks: Vec<RockPlacement>,
    pub light: EnvironmentLight,
    pub report: SceneReport,
}

impl RiverScene {
    /// Run the full pipeline. Fails only on invalid configuration.
    pub fn generate(config: &SceneConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let t = &config.terrain;
        let d = &config.displacement;
        log::info!(
            "Generating riverbed {}x{} ({:?} cells), seed {}",
            t.width,
            t.length,
            t.subdivisions,
            config.seed
        );

        // Waterlines
        let generator = WaterlineGenerator::new(config.channel.clone(), t.width, t.length, t.subdivisions.1);
        let channel = generator.generate(&mut rng);

        // Terrain
        let mut terrain = TerrainGrid::new(t.width, t.length, t.subdivisions)?;
        let regions = classify(&terrain, &channel.left, &channel.right);
        let displacer = FalloffDisplacer::new(d.falloff);
        dig_riverbed(&mut terrain, &regions, &d.dig_params(), &displacer, &mut rng);
        raise_riverbank(
            &mut terrain,
            &regions,
            &d.raise_params(t.width, generator.nominal_centerline()),
            &displacer,
            &mut rng,
        );
        let aligner = BoundaryAligner::new(d.align_radius).with_falloff(d.falloff);
        let align = aligner.align(&mut terrain);

        let bed_min_z = terrain.min_z(regions.bed());
        let bank_max_z = terrain.max_z(regions.bank());
        let ring_max_offset = terrain
            .ring_indices()
            .iter()
            .map(|&i| (terrain.position(i).z - aligner.reference).abs())
            .fold(0.0, f32::max);

        // Water plane, flat at the terrain reference level until sunk
        let mut water = TerrainGrid::new(t.width, t.length, t.subdivisions)?;
        let water_trim = trim(&mut water, &channel.left, &channel.right);

        // Rocks and light
        let mut rocks = scatter_rocks(&terrain, &regions, &config.rocks, &mut rng);
        let radius = config.dome_radius();
        let light = EnvironmentLight::from_path(config.dome.hdri_path.as_deref(), radius, config.dome.below_horizon);

        // Sink onto the dome floor
        let floor = floor_z(radius);
        let sink = Vec3::new(0.0, 0.0, floor);
        terrain.translate(sink);
        water.translate(sink);
        for rock in &mut rocks {
            rock.position += sink;
        }

        let report = SceneReport {
            seed: config.seed,
            terrain_vertices: terrain.vertex_count(),
            terrain_faces: terrain.face_count(),
            bed_vertices: regions.bed().len(),
            bank_vertices: regions.bank().len(),
            on_boundary_vertices: regions.on_boundary(),
            region_warning: regions.warning(),
            waterline_crossings: channel.crossings(),
            bed_min_z,
            bank_max_z,
            ring_max_offset,
            align,
            water: water_trim,
            rocks: rocks.len(),
            dome_radius: radius,
            floor_z: floor,
            fallback_light: light.is_fallback(),
            sun: light.sun,
        };
        log::info!(
            "Scene ready: {} bed / {} bank vertices, bed depth {:?}, {} rocks",
            report.bed_vertices,
            report.bank_vertices,
            report.bed_min_z,
            report.rocks
        );

        Ok(Self {
            channel,
            terrain,
            water,
            rocks,
            light,
            report,
        })
    }

    /// Borrowing view with plain mesh arrays, ready for serialization
    pub fn export(&self) -> SceneExport<'_> {
        SceneExport {
            report: &self.report,
            channel: &self.channel,
            terrain: self.terrain.to_mesh_data(),
            water: self.water.to_mesh_data(),
            rocks: &self.rocks,
            light: &self.light,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::logging;

    #[test]
    fn test_default_scene_end_to_end() {
        logging::init_test();
        let config = SceneConfig::default();
        let scene = RiverScene::generate(&config).unwrap();
        let r = &scene.report;

        assert_eq!(r.terrain_vertices, 39 * 79);
        assert!(r.bed_vertices > 0);
        assert!(r.region_warning.is_none());
        assert!(r.bed_min_z.unwrap() <= -0.2, "bed min z = {:?}", r.bed_min_z);
        assert!(r.bank_max_z.unwrap() >= 0.0, "bank max z = {:?}", r.bank_max_z);
        assert!(r.ring_max_offset < 1e-5, "ring offset {}", r.ring_max_offset);
        assert_eq!(r.rocks, 10);
        assert!(r.fallback_light);
        assert_eq!(r.sun.energy, 100.0 * 30.0);
    }

    #[test]
    fn test_scene_sits_on_dome_floor() {
        let scene = RiverScene::generate(&SceneConfig::default()).unwrap();
        let floor = scene.report.floor_z;
        assert_eq!(floor, -3.0);
        for &i in &scene.terrain.ring_indices() {
            assert!((scene.terrain.position(i).z - floor).abs() < 1e-4);
        }
        // Water surface ends exactly on the floor, level with the aligned ring
        assert!(scene.water.vertex_count() > 0);
        for v in scene.water.vertices() {
            assert_eq!(v.position.z, floor);
        }
        for rock in &scene.rocks {
            assert_eq!(rock.position, scene.terrain.position(rock.vertex));
        }
    }

    #[test]
    fn test_water_is_inside_channel() {
        let scene = RiverScene::generate(&SceneConfig::default()).unwrap();
        assert!(scene.report.water.removed_vertices > 0);
        assert!(scene.water.vertex_count() < scene.terrain.vertex_count());
        for v in scene.water.vertices() {
            let (l, r) = scene.channel.bounds_at(v.position.y).unwrap();
            assert!(l <= v.position.x && v.position.x <= r);
        }
    }

    #[test]
    fn test_same_seed_same_scene() {
        let config = SceneConfig { seed: 2024, ..Default::default() };
        let a = RiverScene::generate(&config).unwrap();
        let b = RiverScene::generate(&config).unwrap();
        assert_eq!(a.report, b.report);
        assert_eq!(a.terrain.to_mesh_data().positions, b.terrain.to_mesh_data().positions);

        let c = RiverScene::generate(&SceneConfig { seed: 2025, ..Default::default() }).unwrap();
        assert_ne!(a.channel, c.channel);
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let mut config = SceneConfig::default();
        config.displacement.max_bank_height = -1.0;
        assert!(RiverScene::generate(&config).is_err());
    }

    #[test]
    fn test_export_serializes() {
        let mut config = SceneConfig::default();
        config.terrain.subdivisions = (8, 16);
        let scene = RiverScene::generate(&config).unwrap();
        let json = serde_json::to_string(&scene.export()).unwrap();
        assert!(json.contains("\"terrain\""));
        assert!(json.contains("\"fallback\""));
    }
}
