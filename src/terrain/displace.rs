//! Proportional (soft-selection) elevation edits

use crate::math::Falloff;

use super::grid::{TerrainGrid, Vertex};

/// Applies one radius-weighted elevation change per call.
///
/// Every vertex closer than `radius` to the target in the xy-plane moves by
/// `delta_z * falloff(distance, radius)`. Edits only add, so a pass over
/// many targets gives the same surface in any order up to float rounding.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FalloffDisplacer {
    pub falloff: Falloff,
}

impl FalloffDisplacer {
    pub fn new(falloff: Falloff) -> Self {
        Self { falloff }
    }

    /// Displace around vertex `index`. Returns how many vertices moved.
    pub fn apply(&self, grid: &mut TerrainGrid, index: usize, delta_z: f32, radius: f32) -> usize {
        self.apply_pinned(grid, index, delta_z, radius, |_| false)
    }

    /// Like [`apply`](Self::apply), but vertices for which `pinned` returns
    /// true stay put. The target itself always moves.
    pub fn apply_pinned(
        &self,
        grid: &mut TerrainGrid,
        index: usize,
        delta_z: f32,
        radius: f32,
        pinned: impl Fn(&Vertex) -> bool,
    ) -> usize {
        if delta_z == 0.0 {
            return 0;
        }
        if radius <= 0.0 {
            grid.displace_z(index, delta_z);
            return 1;
        }

        let mut moves = Vec::new();
        grid.for_each_within(index, radius, |i, d| {
            let w = self.falloff.weight(d, radius);
            if w > 0.0 && (i == index || !pinned(grid.vertex(i))) {
                moves.push((i, w));
            }
        });
        for &(i, w) in &moves {
            if i == index {
                // Exact at the target regardless of the kernel's rounding
                grid.displace_z(i, delta_z);
            } else {
                grid.displace_z(i, delta_z * w);
            }
        }
        moves.len()
    }
}
