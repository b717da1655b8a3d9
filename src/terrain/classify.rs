//! Bed / bank partition of grid vertices against two waterlines

use serde::Serialize;

use crate::curve::Waterline;

use super::grid::{GridEpoch, TerrainGrid};

/// Non-fatal conditions found while classifying
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum RegionWarning {
    /// No vertex lies strictly inside the channel
    EmptyBed,
}

/// Bed and bank vertex indices for one grid topology
#[derive(Clone, Debug)]
pub struct RegionIndexSets {
    epoch: GridEpoch,
    bed: Vec<usize>,
    bank: Vec<usize>,
    on_boundary: usize,
    warning: Option<RegionWarning>,
}

impl RegionIndexSets {
    pub fn epoch(&self) -> GridEpoch {
        self.epoch
    }

    /// Vertices strictly between the left and right boundary
    pub fn bed(&self) -> &[usize] {
        &self.bed
    }

    /// Vertices strictly outside the channel
    pub fn bank(&self) -> &[usize] {
        &self.bank
    }

    /// Vertices exactly on a boundary; they belong to neither set
    pub fn on_boundary(&self) -> usize {
        self.on_boundary
    }

    pub fn warning(&self) -> Option<RegionWarning> {
        self.warning
    }

    /// Panic unless these sets were computed against `grid` as it is now
    pub fn check(&self, grid: &TerrainGrid) {
        grid.assert_epoch(self.epoch, "region index set");
    }
}

/// Where a point sits relative to the channel
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Side {
    Inside,
    Outside,
    OnBoundary,
}

/// Locate `(x, y)` against the nearest-y samples of both waterlines.
/// Without boundary samples there is no channel, so the point is outside.
pub(crate) fn side_of(x: f32, y: f32, left: &Waterline, right: &Waterline) -> Side {
    let (Some(lx), Some(rx)) = (left.boundary_x(y), right.boundary_x(y)) else {
        return Side::Outside;
    };
    if lx < x && x < rx {
        Side::Inside
    } else if x < lx || x > rx {
        Side::Outside
    } else {
        Side::OnBoundary
    }
}

/// Partition every vertex of `grid` into bed and bank.
///
/// A vertex exactly on a boundary sample is counted but left out of both
/// sets. An empty bed is reported through [`RegionIndexSets::warning`].
pub fn classify(grid: &TerrainGrid, left: &Waterline, right: &Waterline) -> RegionIndexSets {
    let mut bed = Vec::new();
    let mut bank = Vec::new();
    let mut on_boundary = 0;

    for v in grid.vertices() {
        match side_of(v.position.x, v.position.y, left, right) {
            Side::Inside => bed.push(v.index),
            Side::Outside => bank.push(v.index),
            Side::OnBoundary => on_boundary += 1,
        }
    }

    let warning = if bed.is_empty() {
        log::warn!(
            "Classification found no bed vertices among {} (channel narrower than the grid spacing?)",
            grid.vertex_count()
        );
        Some(RegionWarning::EmptyBed)
    } else {
        None
    };

    log::debug!(
        "Classified {} bed, {} bank, {} on boundary",
        bed.len(),
        bank.len(),
        on_boundary
    );

    RegionIndexSets {
        epoch: grid.epoch(),
        bed,
        bank,
        on_boundary,
        warning,
    }
}
