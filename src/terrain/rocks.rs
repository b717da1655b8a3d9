//! Random rock placements on the riverbed

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};

use super::classify::RegionIndexSets;
use super::grid::TerrainGrid;

/// How many rocks to place and how large they get
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RockParams {
    pub count: usize,
    /// Smallest per-axis scale as a fraction of terrain width
    pub min_scale_fraction: f32,
    /// Largest per-axis scale as a fraction of terrain width
    pub max_scale_fraction: f32,
}

impl Default for RockParams {
    fn default() -> Self {
        Self {
            count: 10,
            min_scale_fraction: 0.1,
            max_scale_fraction: 0.25,
        }
    }
}

impl RockParams {
    pub fn validate(&self) -> Result<()> {
        if !(self.min_scale_fraction > 0.0) || self.min_scale_fraction > self.max_scale_fraction {
            return Err(Error::config(format!(
                "rock scale fractions must satisfy 0 < min <= max, got {} and {}",
                self.min_scale_fraction, self.max_scale_fraction
            )));
        }
        Ok(())
    }
}

/// One rock: where it sits and how it is shaped
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RockPlacement {
    /// Bed vertex the rock sits on
    pub vertex: usize,
    pub position: Vec3,
    pub scale: Vec3,
    /// Per-axis skew in [0, 1)
    pub skew: Vec3,
    /// Euler rotation in radians, each in [0, 2π)
    pub rotation: Vec3,
}

/// Place up to `params.count` rocks on distinct bed vertices.
///
/// With fewer bed vertices than requested rocks, every bed vertex gets one.
pub fn scatter_rocks<R: Rng + ?Sized>(
    grid: &TerrainGrid,
    sets: &RegionIndexSets,
    params: &RockParams,
    rng: &mut R,
) -> Vec<RockPlacement> {
    sets.check(grid);
    let bed = sets.bed();
    let count = if bed.len() < params.count {
        log::warn!(
            "Only {} bed vertices for {} rocks; placing {} instead",
            bed.len(),
            params.count,
            bed.len()
        );
        bed.len()
    } else {
        params.count
    };

    let min_scale = params.min_scale_fraction * grid.width();
    let max_scale = params.max_scale_fraction * grid.width();
    let axis_scale = |rng: &mut R| rng.gen_range(min_scale..=max_scale);

    let picks = rand::seq::index::sample(rng, bed.len(), count).into_vec();
    let rocks: Vec<RockPlacement> = picks
        .into_iter()
        .map(|k| {
            let vertex = bed[k];
            RockPlacement {
                vertex,
                position: grid.position(vertex),
                scale: Vec3::new(axis_scale(rng), axis_scale(rng), axis_scale(rng)),
                skew: Vec3::new(rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0)),
                rotation: Vec3::new(rng.gen_range(0.0..TAU), rng.gen_range(0.0..TAU), rng.gen_range(0.0..TAU)),
            }
        })
        .collect();

    log::info!("Placed {} rocks", rocks.len());
    rocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Point2D;
    use crate::curve::Waterline;
    use crate::terrain::classify::classify;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn setup(half_channel: f32) -> (TerrainGrid, RegionIndexSets) {
        let grid = TerrainGrid::new(10.0, 10.0, (10, 10)).unwrap();
        let line = |x| Waterline::new(vec![Point2D::new(x, -5.0), Point2D::new(x, 5.0)]).unwrap();
        let sets = classify(&grid, &line(-half_channel), &line(half_channel));
        (grid, sets)
    }

    #[test]
    fn test_rocks_on_distinct_bed_vertices() {
        let (grid, sets) = setup(2.5);
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let rocks = scatter_rocks(&grid, &sets, &RockParams::default(), &mut rng);
        assert_eq!(rocks.len(), 10);

        let mut seen: Vec<usize> = rocks.iter().map(|r| r.vertex).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 10);

        for r in &rocks {
            assert!(sets.bed().contains(&r.vertex));
            assert_eq!(r.position, grid.position(r.vertex));
            for s in r.scale.to_array() {
                assert!((1.0..=2.5).contains(&s), "scale {s}");
            }
            assert!(r.skew.max_element() < 1.0 && r.skew.min_element() >= 0.0);
            assert!(r.rotation.max_element() < TAU);
        }
    }

    #[test]
    fn test_clamped_to_bed_size() {
        // Only x = 0 is inside: one column of 11 vertices
        let (grid, sets) = setup(0.5);
        let params = RockParams { count: 50, ..Default::default() };
        let rocks = scatter_rocks(&grid, &sets, &params, &mut ChaCha8Rng::seed_from_u64(1));
        assert_eq!(rocks.len(), 11);
    }
}
