//! Riverbed digging and bank raising passes

use rand::Rng;

use crate::core::{Error, Result};

use super::classify::RegionIndexSets;
use super::displace::FalloffDisplacer;
use super::grid::TerrainGrid;

/// Log progress every this many edits
const PROGRESS_INTERVAL: usize = 100;

/// Depth range and radius for digging the bed
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DigParams {
    pub min_depth: f32,
    pub max_depth: f32,
    pub radius: f32,
}

impl Default for DigParams {
    fn default() -> Self {
        Self {
            min_depth: 0.2,
            max_depth: 0.5,
            radius: 2.5,
        }
    }
}

impl DigParams {
    pub fn validate(&self) -> Result<()> {
        check_range("depth", self.min_depth, self.max_depth)?;
        check_radius("dig radius", self.radius)
    }
}

/// Height range and radius for raising the banks
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RaiseParams {
    pub min_height: f32,
    pub max_height: f32,
    pub radius: f32,
    /// x of the channel centerline
    pub centerline_x: f32,
    /// Lateral distance at which the full height applies
    pub half_width: f32,
}

impl RaiseParams {
    /// Defaults for a terrain `width` wide, centred on x = 0
    pub fn for_width(width: f32) -> Self {
        Self {
            min_height: 0.0,
            max_height: 0.2,
            radius: 3.0,
            centerline_x: 0.0,
            half_width: 0.5 * width,
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_range("bank height", self.min_height, self.max_height)?;
        check_radius("bank radius", self.radius)?;
        if !(self.half_width > 0.0) {
            return Err(Error::config(format!(
                "bank half width must be positive, got {}",
                self.half_width
            )));
        }
        Ok(())
    }

    /// Lateral scale for a vertex at `x`: 0 on the centerline, 1 at half width
    pub fn lateral_factor(&self, x: f32) -> f32 {
        (x - self.centerline_x).abs() / self.half_width
    }
}

fn check_range(name: &str, min: f32, max: f32) -> Result<()> {
    if !(min.is_finite() && max.is_finite()) || min > max {
        return Err(Error::config(format!("{name} range is invalid: min {min} > max {max}")));
    }
    Ok(())
}

fn check_radius(name: &str, radius: f32) -> Result<()> {
    if !(radius > 0.0) {
        return Err(Error::config(format!("{name} must be positive, got {radius}")));
    }
    Ok(())
}

/// Lower every bed vertex by a depth drawn from `[min_depth, max_depth]`.
/// Returns the number of edits issued.
pub fn dig_riverbed<R: Rng + ?Sized>(
    grid: &mut TerrainGrid,
    sets: &RegionIndexSets,
    params: &DigParams,
    displacer: &FalloffDisplacer,
    rng: &mut R,
) -> usize {
    sets.check(grid);
    let total = sets.bed().len();
    for (n, &index) in sets.bed().iter().enumerate() {
        let depth = rng.gen_range(params.min_depth..=params.max_depth);
        displacer.apply(grid, index, -depth, params.radius);
        if (n + 1) % PROGRESS_INTERVAL == 0 {
            log::debug!("Digging riverbed: {}/{}", n + 1, total);
        }
    }
    log::info!("Dug {} riverbed vertices", total);
    total
}

/// Raise every bank vertex by a height drawn from `[min_height, max_height]`
/// and scaled by its lateral distance from the centerline.
/// Returns the number of edits issued.
pub fn raise_riverbank<R: Rng + ?Sized>(
    grid: &mut TerrainGrid,
    sets: &RegionIndexSets,
    params: &RaiseParams,
    displacer: &FalloffDisplacer,
    rng: &mut R,
) -> usize {
    sets.check(grid);
    let total = sets.bank().len();
    for (n, &index) in sets.bank().iter().enumerate() {
        let height = rng.gen_range(params.min_height..=params.max_height);
        let scale = params.lateral_factor(grid.position(index).x);
        displacer.apply(grid, index, height * scale, params.radius);
        if (n + 1) % PROGRESS_INTERVAL == 0 {
            log::debug!("Raising riverbank: {}/{}", n + 1, total);
        }
    }
    log::info!("Raised {} riverbank vertices", total);
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Point2D;
    use crate::curve::Waterline;
    use crate::terrain::classify::classify;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn setup() -> (TerrainGrid, RegionIndexSets) {
        let grid = TerrainGrid::new(20.0, 20.0, (20, 20)).unwrap();
        let left = Waterline::new(vec![Point2D::new(-3.5, -10.0), Point2D::new(-3.5, 10.0)]).unwrap();
        let right = Waterline::new(vec![Point2D::new(3.5, -10.0), Point2D::new(3.5, 10.0)]).unwrap();
        let sets = classify(&grid, &left, &right);
        (grid, sets)
    }

    #[test]
    fn test_dig_lowers_bed() {
        let (mut grid, sets) = setup();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let n = dig_riverbed(&mut grid, &sets, &DigParams::default(), &FalloffDisplacer::default(), &mut rng);
        assert_eq!(n, sets.bed().len());
        let deepest = grid.min_z(sets.bed()).unwrap();
        assert!(deepest <= -0.2, "deepest bed vertex only at {deepest}");
        assert!(grid.vertices().iter().all(|v| v.position.z <= 0.0));
    }

    #[test]
    fn test_raise_scales_with_lateral_distance() {
        let (mut grid, sets) = setup();
        let params = RaiseParams {
            min_height: 0.2,
            max_height: 0.2,
            radius: 0.5,
            ..RaiseParams::for_width(20.0)
        };
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        raise_riverbank(&mut grid, &sets, &params, &FalloffDisplacer::default(), &mut rng);
        // Radius below grid spacing: each bank vertex only moves itself
        let outer = grid.vertex_at(10, 0).unwrap();
        let inner = grid.vertex_at(10, 6).unwrap();
        assert!((grid.position(outer).z - 0.2).abs() < 1e-6);
        assert!((grid.position(inner).z - 0.2 * 0.4).abs() < 1e-6);
        assert!(grid.max_z(sets.bank()).unwrap() >= 0.0);
    }

    #[test]
    fn test_seeded_passes_repeat() {
        let run = || {
            let (mut grid, sets) = setup();
            let mut rng = ChaCha8Rng::seed_from_u64(11);
            let d = FalloffDisplacer::default();
            dig_riverbed(&mut grid, &sets, &DigParams::default(), &d, &mut rng);
            raise_riverbank(&mut grid, &sets, &RaiseParams::for_width(20.0), &d, &mut rng);
            grid.to_mesh_data().positions
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_params_validation() {
        assert!(DigParams::default().validate().is_ok());
        let inverted = DigParams { min_depth: 0.6, ..Default::default() };
        assert!(inverted.validate().is_err());
        let flat = RaiseParams { radius: 0.0, ..RaiseParams::for_width(10.0) };
        assert!(flat.validate().is_err());
    }
}
