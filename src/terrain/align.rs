//! Perimeter alignment so the terrain tiles against a flat neighbour

use serde::Serialize;

use crate::math::Falloff;

use super::displace::FalloffDisplacer;
use super::grid::TerrainGrid;

/// What an alignment pass did
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct AlignReport {
    pub ring_vertices: usize,
    /// Falloff edits issued by the sweep
    pub sweep_edits: usize,
    /// Largest ring offset left after the sweep
    pub residual: f32,
    /// Pinned corrections issued to remove that residual
    pub settle_edits: usize,
}

/// Pulls every ring vertex to `reference` with falloff edits.
///
/// The sweep visits each ring vertex once and cancels its current offset
/// with a full-radius edit, blending the change inward. Later ring edits
/// can disturb earlier ring vertices, so a settle pass then corrects each
/// remaining offset with the other ring vertices pinned. Afterwards the
/// ring sits at `reference`, and aligning again issues no edits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundaryAligner {
    pub radius: f32,
    pub reference: f32,
    pub falloff: Falloff,
}

impl BoundaryAligner {
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            reference: 0.0,
            falloff: Falloff::default(),
        }
    }

    pub fn with_reference(mut self, reference: f32) -> Self {
        self.reference = reference;
        self
    }

    pub fn with_falloff(mut self, falloff: Falloff) -> Self {
        self.falloff = falloff;
        self
    }

    pub fn align(&self, grid: &mut TerrainGrid) -> AlignReport {
        let displacer = FalloffDisplacer::new(self.falloff);
        let ring = grid.ring_indices();
        let mut report = AlignReport {
            ring_vertices: ring.len(),
            ..Default::default()
        };

        for &i in &ring {
            let delta = self.reference - grid.position(i).z;
            if delta != 0.0 {
                displacer.apply(grid, i, delta, self.radius);
                report.sweep_edits += 1;
            }
        }

        for &i in &ring {
            let delta = self.reference - grid.position(i).z;
            report.residual = report.residual.max(delta.abs());
            if delta != 0.0 {
                displacer.apply_pinned(grid, i, delta, self.radius, |v| v.is_boundary);
                report.settle_edits += 1;
            }
        }

        log::debug!(
            "Aligned {} ring vertices ({} sweep, {} settle, residual {:.2e})",
            report.ring_vertices,
            report.sweep_edits,
            report.settle_edits,
            report.residual
        );
        report
    }
}
