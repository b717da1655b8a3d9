//! Paired waterlines bounding one meandering channel

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};
use crate::curve::{generate_control_set, CurveKind, DeviationRanges, Waterline};

/// Parameters controlling the channel shape
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelParams {
    /// Left bank shift toward -x, as a fraction of terrain width
    pub left_offset_fraction: f32,
    /// Right bank shift toward +x, as a fraction of terrain width
    pub right_offset_fraction: f32,
    /// Deviating control points on the left bank
    pub num_left_deviations: usize,
    /// Deviating control points on the right bank
    pub num_right_deviations: usize,
    /// Curve fitter for both banks
    pub curve: CurveKind,
    /// Deviation ranges; derived from the terrain width when unset
    pub deviation_ranges: Option<DeviationRanges>,
}

impl Default for ChannelParams {
    fn default() -> Self {
        Self {
            left_offset_fraction: 0.25,
            right_offset_fraction: 0.25,
            num_left_deviations: 14,
            num_right_deviations: 28,
            curve: CurveKind::Bezier,
            deviation_ranges: None,
        }
    }
}

impl ChannelParams {
    pub fn validate(&self) -> Result<()> {
        for (name, v) in [
            ("left_offset_fraction", self.left_offset_fraction),
            ("right_offset_fraction", self.right_offset_fraction),
        ] {
            if !(0.0..=1.0).contains(&v) {
                return Err(Error::config(format!("{name} must be in [0, 1], got {v}")));
            }
        }
        if let Some(ranges) = &self.deviation_ranges {
            ranges.validate()?;
        }
        Ok(())
    }
}

/// Left and right waterline of one channel
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub left: Waterline,
    pub right: Waterline,
}

impl Channel {
    pub fn new(left: Waterline, right: Waterline) -> Self {
        Self { left, right }
    }

    /// Left and right boundary x at the samples nearest to `y`
    pub fn bounds_at(&self, y: f32) -> Option<(f32, f32)> {
        Some((self.left.boundary_x(y)?, self.right.boundary_x(y)?))
    }

    /// Samples where the left bank does not stay left of the right bank
    pub fn crossings(&self) -> usize {
        self.left
            .points()
            .iter()
            .zip(self.right.points())
            .filter(|(l, r)| l.x >= r.x)
            .count()
    }

    /// Midpoint between the two banks' mean offsets
    pub fn mean_centerline(&self) -> f32 {
        let mean = |w: &Waterline| {
            if w.is_empty() {
                0.0
            } else {
                w.points().iter().map(|p| p.x).sum::<f32>() / w.len() as f32
            }
        };
        0.5 * (mean(&self.left) + mean(&self.right))
    }
}

/// Builds the two banks of a channel across a terrain
#[derive(Clone, Debug)]
pub struct WaterlineGenerator {
    params: ChannelParams,
    width: f32,
    length: f32,
    samples: usize,
}

impl WaterlineGenerator {
    /// `length_subdivisions` cells along y give `length_subdivisions + 2`
    /// samples per waterline.
    pub fn new(params: ChannelParams, width: f32, length: f32, length_subdivisions: usize) -> Self {
        Self {
            params,
            width,
            length,
            samples: length_subdivisions + 2,
        }
    }

    pub fn params(&self) -> &ChannelParams {
        &self.params
    }

    /// Samples per waterline
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Centerline implied by the offsets, in terrain x
    pub fn nominal_centerline(&self) -> f32 {
        0.5 * (self.params.right_offset_fraction - self.params.left_offset_fraction) * self.width
    }

    /// Draw both banks. Each bank is fitted around x = 0 and then shifted,
    /// so the zero "no deviation" marker survives until fitting.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Channel {
        let ranges = self
            .params
            .deviation_ranges
            .unwrap_or_else(|| DeviationRanges::for_width(self.width));

        let left_ctrl = generate_control_set(
            rng,
            self.samples,
            self.length,
            self.params.num_left_deviations,
            &ranges,
        );
        let right_ctrl = generate_control_set(
            rng,
            self.samples,
            self.length,
            self.params.num_right_deviations,
            &ranges,
        );

        let left = self
            .params
            .curve
            .fit(&left_ctrl, self.width)
            .shifted(-self.params.left_offset_fraction * self.width);
        let right = self
            .params
            .curve
            .fit(&right_ctrl, self.width)
            .shifted(self.params.right_offset_fraction * self.width);

        let channel = Channel::new(left, right);
        let crossings = channel.crossings();
        if crossings > 0 {
            log::warn!("Waterlines cross at {} of {} samples", crossings, self.samples);
        }
        log::debug!(
            "Generated {:?} waterlines: {} samples, {}/{} deviations",
            self.params.curve,
            self.samples,
            self.params.num_left_deviations,
            self.params.num_right_deviations
        );
        channel
    }
}
