//! Sparse random control deviations along the secondary axis

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::{Error, Point2D, Result};
use crate::math::linspace;

/// Ordered control points, evenly spaced in y.
///
/// A point with `x == 0.0` carries no deviation; the rest are the true
/// control points the curve fitters bend toward.
#[derive(Clone, Debug, PartialEq)]
pub struct ControlSet {
    points: Vec<Point2D>,
}

impl ControlSet {
    /// Wrap existing points; y must be strictly increasing.
    pub fn new(points: Vec<Point2D>) -> Result<Self> {
        if points.windows(2).any(|w| w[1].y <= w[0].y) {
            return Err(Error::Curve("control point y-values must be strictly increasing".into()));
        }
        Ok(Self { points })
    }

    /// `count` points along `[-axis_range/2, axis_range/2]`, none deviating
    pub fn straight(count: usize, axis_range: f32) -> Self {
        let half = 0.5 * axis_range;
        let points = linspace(-half, half, count)
            .into_iter()
            .map(|y| Point2D::new(0.0, y))
            .collect();
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

    /// Points carrying a nonzero deviation, in order
    pub fn deviations(&self) -> impl Iterator<Item = Point2D> + '_ {
        self.points.iter().copied().filter(|p| p.x != 0.0)
    }

    pub fn deviation_count(&self) -> usize {
        self.deviations().count()
    }

    /// Fewer than two deviations; fitters return such sets unchanged
    pub fn is_degenerate(&self) -> bool {
        self.deviation_count() < 2
    }
}

/// The two disjoint x-ranges a deviation is drawn from
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeviationRanges {
    /// Bulge toward negative x, `(min, max)`
    pub left: (f32, f32),
    /// Bulge toward positive x, `(min, max)`
    pub right: (f32, f32),
}

impl DeviationRanges {
    /// Ranges scaled to a terrain width: 20%..50% of the half-width on each side
    pub fn for_width(width: f32) -> Self {
        let half = 0.5 * width;
        Self {
            left: (-0.5 * half, -0.2 * half),
            right: (0.2 * half, 0.5 * half),
        }
    }

    /// Check both ranges are non-empty, disjoint and exclude zero
    pub fn validate(&self) -> Result<()> {
        let (l0, l1) = self.left;
        let (r0, r1) = self.right;
        if !(l0 < l1) || !(r0 < r1) {
            return Err(Error::config(format!(
                "deviation ranges must satisfy min < max, got left {:?} right {:?}",
                self.left, self.right
            )));
        }
        if (l0 <= 0.0 && l1 >= 0.0) || (r0 <= 0.0 && r1 >= 0.0) {
            return Err(Error::config("deviation ranges must not contain 0"));
        }
        if l1 >= r0 && r1 >= l0 {
            return Err(Error::config("left and right deviation ranges overlap"));
        }
        Ok(())
    }
}

/// Generate `count` evenly spaced control points with `num_deviations`
/// randomly chosen indices bent left or right by a fair coin flip.
///
/// `num_deviations` is clamped to `count`. Ranges are assumed valid.
pub fn generate_control_set<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    axis_range: f32,
    num_deviations: usize,
    ranges: &DeviationRanges,
) -> ControlSet {
    let mut set = ControlSet::straight(count, axis_range);
    let amount = num_deviations.min(count);

    for i in rand::seq::index::sample(rng, count, amount).into_iter() {
        let (min, max) = if rng.gen_bool(0.5) { ranges.left } else { ranges.right };
        set.points[i].x = rng.gen_range(min..max);
    }
    set
}
