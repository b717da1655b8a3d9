//! Fitted boundary curve sampled along y

use serde::{Deserialize, Serialize};

use crate::core::{Error, Point2D, Result};

/// Ordered boundary samples; y never decreases and x is the boundary offset
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Waterline {
    points: Vec<Point2D>,
}

impl Waterline {
    /// Wrap samples; fails if y ever decreases
    pub fn new(points: Vec<Point2D>) -> Result<Self> {
        if points.windows(2).any(|w| w[1].y < w[0].y) {
            return Err(Error::Curve("waterline y-values must be non-decreasing".into()));
        }
        Ok(Self { points })
    }

    /// Samples already known to be ordered in y
    pub(crate) fn from_ordered(points: Vec<Point2D>) -> Self {
        debug_assert!(points.windows(2).all(|w| w[1].y >= w[0].y));
        Self { points }
    }

    pub fn points(&self) -> &[Point2D] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Index of the sample whose y is nearest to `y`.
    ///
    /// Binary search over the ordered samples. When two samples are equally
    /// near, the lower index wins, matching a first-minimum linear scan.
    pub fn nearest_index(&self, y: f32) -> Option<usize> {
        if self.points.is_empty() {
            return None;
        }
        let above = self.points.partition_point(|p| p.y < y);
        if above == 0 {
            return Some(0);
        }
        if above == self.points.len() {
            // Last index with the maximal y; step back over duplicates
            let last_y = self.points[above - 1].y;
            let first = self.points.partition_point(|p| p.y < last_y);
            return Some(first);
        }
        let below = above - 1;
        let below_y = self.points[below].y;
        let below_first = self.points.partition_point(|p| p.y < below_y);
        let d_below = (y - below_y).abs();
        let d_above = (self.points[above].y - y).abs();
        if d_below <= d_above { Some(below_first) } else { Some(above) }
    }

    /// Boundary offset (x) at the sample nearest to `y`
    pub fn boundary_x(&self, y: f32) -> Option<f32> {
        self.nearest_index(y).map(|i| self.points[i].x)
    }

    /// Copy shifted sideways by `dx`
    pub fn shifted(&self, dx: f32) -> Self {
        Self {
            points: self.points.iter().map(|p| Point2D::new(p.x + dx, p.y)).collect(),
        }
    }

    /// Smallest and largest x over all samples
    pub fn x_extent(&self) -> Option<(f32, f32)> {
        let first = self.points.first()?.x;
        Some(self.points.iter().fold((first, first), |(lo, hi), p| (lo.min(p.x), hi.max(p.x))))
    }
}
