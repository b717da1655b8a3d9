//! Destructive trim of a grid to the channel between two waterlines

use serde::Serialize;

use crate::curve::Waterline;

use super::classify::{side_of, Side};
use super::grid::TerrainGrid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TrimReport {
    pub removed_vertices: usize,
    pub removed_faces: usize,
    pub remaining_vertices: usize,
    pub remaining_faces: usize,
}

/// Remove every vertex outside `[left.x, right.x]` at its nearest-y sample.
///
/// Vertices exactly on a boundary survive. Faces touching a removed vertex
/// go with it. The grid starts a new epoch, so index sets computed earlier
/// are refused from here on.
pub fn trim(grid: &mut TerrainGrid, left: &Waterline, right: &Waterline) -> TrimReport {
    let remove: Vec<bool> = grid
        .vertices()
        .iter()
        .map(|v| side_of(v.position.x, v.position.y, left, right) == Side::Outside)
        .collect();

    let (removed_vertices, removed_faces) = grid.remove_vertices(&remove);
    let report = TrimReport {
        removed_vertices,
        removed_faces,
        remaining_vertices: grid.vertex_count(),
        remaining_faces: grid.face_count(),
    };
    if report.remaining_vertices == 0 {
        log::warn!("Trimming removed every vertex of the grid");
    }
    log::debug!(
        "Trimmed {} vertices and {} faces, {} vertices left",
        removed_vertices,
        removed_faces,
        report.remaining_vertices
    );
    report
}
