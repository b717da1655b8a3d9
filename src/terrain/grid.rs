//! Regular terrain grid with quad faces and row/column addressing.
//!
//! Vertices are laid out row-major, `index = row * cols + col`, with rows
//! running along y (length) and columns along x (width). The grid is
//! centred on the origin and starts flat at z = 0. Vertex removal keeps the
//! lattice lookup valid, drops every face touching a removed vertex and
//! starts a new [`GridEpoch`], so index sets taken before the removal can
//! be detected and refused.

use std::sync::atomic::{AtomicU64, Ordering};

use glam::{Vec2, Vec3};
use serde::Serialize;

use crate::core::{Error, Result};

static NEXT_EPOCH: AtomicU64 = AtomicU64::new(1);

/// Identifies one topology snapshot of one grid
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridEpoch(u64);

impl GridEpoch {
    fn next() -> Self {
        Self(NEXT_EPOCH.fetch_add(1, Ordering::Relaxed))
    }
}

/// A grid vertex. Mutated in place, never re-created mid-pipeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    /// Position in the vertex array
    pub index: usize,
    /// Lattice row (along y)
    pub row: usize,
    /// Lattice column (along x)
    pub col: usize,
    pub position: Vec3,
    /// On the mesh perimeter: the lattice's outer ring, or next to a
    /// removed vertex once [`TerrainGrid::remove_vertices`] has run
    pub is_boundary: bool,
}

/// Plain vertex/face arrays for handing the mesh to a host
#[derive(Clone, Debug, Default, Serialize)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub quads: Vec<[usize; 4]>,
}

/// Terrain grid owning its vertices and quad faces
#[derive(Clone, Debug)]
pub struct TerrainGrid {
    width: f32,
    length: f32,
    rows: usize,
    cols: usize,
    vertices: Vec<Vertex>,
    /// Counter-clockwise quads of vertex indices
    faces: Vec<[usize; 4]>,
    /// `row * cols + col` -> vertex index, `None` once removed
    lattice: Vec<Option<usize>>,
    /// False once any vertex was moved off its lattice footprint
    planar_aligned: bool,
    epoch: GridEpoch,
}

impl TerrainGrid {
    /// Create a flat grid of `width` x `length` with `subdivisions.0` cells
    /// along x and `subdivisions.1` cells along y.
    pub fn new(width: f32, length: f32, subdivisions: (usize, usize)) -> Result<Self> {
        if !(width > 0.0) || !(length > 0.0) {
            return Err(Error::config(format!(
                "terrain extents must be positive, got {width} x {length}"
            )));
        }
        let (sx, sy) = subdivisions;
        if sx < 1 || sy < 1 {
            return Err(Error::config(format!(
                "subdivisions must be at least 1, got {subdivisions:?}"
            )));
        }

        let cols = sx + 1;
        let rows = sy + 1;
        let dx = width / sx as f32;
        let dy = length / sy as f32;

        let mut vertices = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                let index = row * cols + col;
                vertices.push(Vertex {
                    index,
                    row,
                    col,
                    position: Vec3::new(-0.5 * width + col as f32 * dx, -0.5 * length + row as f32 * dy, 0.0),
                    is_boundary: row == 0 || col == 0 || row == rows - 1 || col == cols - 1,
                });
            }
        }

        let mut faces = Vec::with_capacity(sx * sy);
        for row in 0..sy {
            for col in 0..sx {
                let a = row * cols + col;
                let d = (row + 1) * cols + col;
                faces.push([a, a + 1, d + 1, d]);
            }
        }

        Ok(Self {
            width,
            length,
            rows,
            cols,
            lattice: (0..rows * cols).map(Some).collect(),
            vertices,
            faces,
            planar_aligned: true,
            epoch: GridEpoch::next(),
        })
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn length(&self) -> f32 {
        self.length
    }

    /// Lattice rows (vertices along y)
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Lattice columns (vertices along x)
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Distance between neighbouring lattice columns (x) and rows (y)
    pub fn spacing(&self) -> Vec2 {
        Vec2::new(
            self.width / (self.cols - 1) as f32,
            self.length / (self.rows - 1) as f32,
        )
    }

    pub fn epoch(&self) -> GridEpoch {
        self.epoch
    }

    /// Panic if `epoch` belongs to another grid or an earlier topology.
    ///
    /// Indices captured before a vertex removal point at the wrong vertices;
    /// using them is a contract violation, not a recoverable error.
    pub fn assert_epoch(&self, epoch: GridEpoch, what: &str) {
        assert_eq!(
            self.epoch, epoch,
            "{what} was computed against a different grid topology; recompute it after trimming"
        );
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn vertex(&self, index: usize) -> &Vertex {
        &self.vertices[index]
    }

    pub fn position(&self, index: usize) -> Vec3 {
        self.vertices[index].position
    }

    /// Move a vertex anywhere. Moving it off its lattice footprint makes
    /// radius queries fall back to a full scan.
    pub fn set_position(&mut self, index: usize, position: Vec3) {
        let v = &mut self.vertices[index];
        if v.position.x != position.x || v.position.y != position.y {
            self.planar_aligned = false;
        }
        v.position = position;
    }

    pub fn set_z(&mut self, index: usize, z: f32) {
        self.vertices[index].position.z = z;
    }

    pub fn displace_z(&mut self, index: usize, delta: f32) {
        self.vertices[index].position.z += delta;
    }

    /// Vertex index at a lattice cell, if that vertex still exists
    pub fn vertex_at(&self, row: usize, col: usize) -> Option<usize> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.lattice[row * self.cols + col]
    }

    pub fn faces(&self) -> &[[usize; 4]] {
        &self.faces
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Indices of vertices on the current mesh perimeter
    pub fn ring_indices(&self) -> Vec<usize> {
        self.vertices
            .iter()
            .filter(|v| v.is_boundary)
            .map(|v| v.index)
            .collect()
    }

    /// Lowest elevation among `indices`
    pub fn min_z(&self, indices: &[usize]) -> Option<f32> {
        indices
            .iter()
            .map(|&i| self.vertices[i].position.z)
            .reduce(f32::min)
    }

    /// Highest elevation among `indices`
    pub fn max_z(&self, indices: &[usize]) -> Option<f32> {
        indices
            .iter()
            .map(|&i| self.vertices[i].position.z)
            .reduce(f32::max)
    }

    /// Move every vertex by `offset`
    pub fn translate(&mut self, offset: Vec3) {
        for v in &mut self.vertices {
            v.position += offset;
        }
    }

    /// Call `f(index, planar_distance)` for every vertex strictly closer
    /// than `radius` to vertex `center` in the xy-plane.
    pub fn for_each_within(&self, center: usize, radius: f32, mut f: impl FnMut(usize, f32)) {
        let origin = self.vertices[center].position.truncate();

        if !self.planar_aligned {
            for v in &self.vertices {
                let d = v.position.truncate().distance(origin);
                if d < radius {
                    f(v.index, d);
                }
            }
            return;
        }

        let spacing = self.spacing();
        let col_span = (radius / spacing.x).ceil().max(0.0) as usize;
        let row_span = (radius / spacing.y).ceil().max(0.0) as usize;
        let c = &self.vertices[center];
        let row_lo = c.row.saturating_sub(row_span);
        let row_hi = (c.row + row_span).min(self.rows - 1);
        let col_lo = c.col.saturating_sub(col_span);
        let col_hi = (c.col + col_span).min(self.cols - 1);

        for row in row_lo..=row_hi {
            for col in col_lo..=col_hi {
                let Some(i) = self.lattice[row * self.cols + col] else {
                    continue;
                };
                let d = self.vertices[i].position.truncate().distance(origin);
                if d < radius {
                    f(i, d);
                }
            }
        }
    }

    /// Remove every vertex with `remove[index] == true`.
    ///
    /// Faces touching a removed vertex are dropped, surviving vertices are
    /// compacted and renumbered, and the grid moves to a new epoch.
    /// Returns `(removed_vertices, removed_faces)`.
    pub fn remove_vertices(&mut self, remove: &[bool]) -> (usize, usize) {
        assert_eq!(remove.len(), self.vertices.len(), "removal mask length mismatch");

        let mut remap = vec![None; self.vertices.len()];
        let mut kept = Vec::with_capacity(self.vertices.len());
        for v in &self.vertices {
            if !remove[v.index] {
                remap[v.index] = Some(kept.len());
                kept.push(Vertex { index: kept.len(), ..*v });
            }
        }
        let removed_vertices = self.vertices.len() - kept.len();

        let before = self.faces.len();
        self.faces = self
            .faces
            .iter()
            .filter_map(|face| {
                Some([remap[face[0]]?, remap[face[1]]?, remap[face[2]]?, remap[face[3]]?])
            })
            .collect();
        let removed_faces = before - self.faces.len();

        self.lattice.iter_mut().for_each(|cell| *cell = None);
        for v in &kept {
            self.lattice[v.row * self.cols + v.col] = Some(v.index);
        }
        self.vertices = kept;
        for i in 0..self.vertices.len() {
            let (row, col) = (self.vertices[i].row, self.vertices[i].col);
            self.vertices[i].is_boundary = self.on_perimeter(row, col);
        }
        self.epoch = GridEpoch::next();

        (removed_vertices, removed_faces)
    }

    /// Outer lattice ring, or a 4-neighbour cell with no vertex
    fn on_perimeter(&self, row: usize, col: usize) -> bool {
        if row == 0 || col == 0 || row == self.rows - 1 || col == self.cols - 1 {
            return true;
        }
        [(row - 1, col), (row + 1, col), (row, col - 1), (row, col + 1)]
            .iter()
            .any(|&(r, c)| self.lattice[r * self.cols + c].is_none())
    }

    /// Copy positions and faces out as plain arrays
    pub fn to_mesh_data(&self) -> MeshData {
        MeshData {
            positions: self.vertices.iter().map(|v| v.position.to_array()).collect(),
            quads: self.faces.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_and_indexing() {
        let grid = TerrainGrid::new(20.0, 40.0, (4, 8)).unwrap();
        assert_eq!(grid.cols(), 5);
        assert_eq!(grid.rows(), 9);
        assert_eq!(grid.vertex_count(), 45);
        assert_eq!(grid.face_count(), 32);

        let v = grid.vertex(2 * 5 + 3);
        assert_eq!((v.row, v.col), (2, 3));
        assert_eq!(grid.vertex_at(2, 3), Some(13));
        assert!((v.position.x - 5.0).abs() < 1e-5);
        assert!((v.position.y - -10.0).abs() < 1e-5);
        assert_eq!(v.position.z, 0.0);

        assert_eq!(grid.position(0), Vec3::new(-10.0, -20.0, 0.0));
        let last = grid.position(44);
        assert!((last - Vec3::new(10.0, 20.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_ring() {
        let grid = TerrainGrid::new(4.0, 4.0, (4, 4)).unwrap();
        let ring = grid.ring_indices();
        assert_eq!(ring.len(), 16);
        assert!(!grid.vertex(12).is_boundary);
        assert!(grid.vertex(0).is_boundary);
        assert!(grid.vertex(24).is_boundary);
    }

    #[test]
    fn test_rejects_bad_dimensions() {
        assert!(TerrainGrid::new(0.0, 10.0, (2, 2)).is_err());
        assert!(TerrainGrid::new(10.0, 10.0, (0, 2)).is_err());
        assert!(TerrainGrid::new(10.0, f32::NAN, (2, 2)).is_err());
    }

    #[test]
    fn test_within_matches_full_scan() {
        let mut grid = TerrainGrid::new(10.0, 12.0, (10, 12)).unwrap();
        let center = grid.vertex_at(3, 4).unwrap();
        let mut windowed = Vec::new();
        grid.for_each_within(center, 2.3, |i, _| windowed.push(i));
        windowed.sort_unstable();

        // Force the brute-force path
        let p = grid.position(0);
        grid.set_position(0, p + Vec3::new(0.0, 0.0, 1.0));
        assert!(grid.planar_aligned);
        grid.set_position(0, p + Vec3::new(0.01, 0.0, 0.0));
        grid.set_position(0, p);
        let mut full = Vec::new();
        grid.for_each_within(center, 2.3, |i, _| full.push(i));
        full.sort_unstable();

        assert_eq!(windowed, full);
        assert!(windowed.contains(&center));
    }

    #[test]
    fn test_remove_vertices_compacts_and_drops_faces() {
        let mut grid = TerrainGrid::new(3.0, 3.0, (3, 3)).unwrap();
        let old_epoch = grid.epoch();
        let mut remove = vec![false; grid.vertex_count()];
        remove[grid.vertex_at(0, 0).unwrap()] = true;
        remove[grid.vertex_at(1, 1).unwrap()] = true;

        let (rv, rf) = grid.remove_vertices(&remove);
        assert_eq!(rv, 2);
        // (1,1) touches four quads, (0,0) touches one of those
        assert_eq!(rf, 4);
        assert_eq!(grid.vertex_count(), 14);
        assert_eq!(grid.face_count(), 5);
        assert_ne!(grid.epoch(), old_epoch);
        assert_eq!(grid.vertex_at(0, 0), None);
        assert_eq!(grid.vertex_at(1, 1), None);

        for (i, v) in grid.vertices().iter().enumerate() {
            assert_eq!(v.index, i);
            assert_eq!(grid.vertex_at(v.row, v.col), Some(i));
        }
        for face in grid.faces() {
            assert!(face.iter().all(|&i| i < grid.vertex_count()));
        }
    }

    #[test]
    fn test_removal_opens_new_perimeter() {
        let mut grid = TerrainGrid::new(4.0, 4.0, (4, 4)).unwrap();
        assert_eq!(grid.ring_indices().len(), 16);
        let mut remove = vec![false; grid.vertex_count()];
        remove[grid.vertex_at(2, 2).unwrap()] = true;
        grid.remove_vertices(&remove);

        for (row, col) in [(1, 2), (3, 2), (2, 1), (2, 3)] {
            let i = grid.vertex_at(row, col).unwrap();
            assert!(grid.vertex(i).is_boundary, "({}, {}) borders the hole", row, col);
        }
        for (row, col) in [(1, 1), (1, 3), (3, 1), (3, 3)] {
            let i = grid.vertex_at(row, col).unwrap();
            assert!(!grid.vertex(i).is_boundary, "({}, {}) only touches it diagonally", row, col);
        }
        assert_eq!(grid.ring_indices().len(), 20);
        assert!(grid.vertex(grid.vertex_at(0, 0).unwrap()).is_boundary);
    }

    #[test]
    #[should_panic(expected = "different grid topology")]
    fn test_stale_epoch_panics() {
        let mut grid = TerrainGrid::new(2.0, 2.0, (2, 2)).unwrap();
        let epoch = grid.epoch();
        let mut remove = vec![false; grid.vertex_count()];
        remove[0] = true;
        grid.remove_vertices(&remove);
        grid.assert_epoch(epoch, "bed index set");
    }

    #[test]
    fn test_min_max_and_translate() {
        let mut grid = TerrainGrid::new(2.0, 2.0, (2, 2)).unwrap();
        grid.set_z(4, -0.5);
        grid.displace_z(1, 0.25);
        assert_eq!(grid.min_z(&[0, 1, 4]), Some(-0.5));
        assert_eq!(grid.max_z(&[0, 1, 4]), Some(0.25));
        assert_eq!(grid.min_z(&[]), None);

        grid.translate(Vec3::new(0.0, 0.0, -3.0));
        assert_eq!(grid.position(4).z, -3.5);
        let mesh = grid.to_mesh_data();
        assert_eq!(mesh.positions.len(), 9);
        assert_eq!(mesh.quads.len(), 4);
    }
}
