//! Radial falloff kernels for proportional displacement

use serde::{Deserialize, Serialize};

/// Smooth radial falloff profile.
///
/// Every profile is 1 at distance 0, 0 at or beyond the radius, and has a
/// zero first derivative at both ends, so overlapping edits never crease.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Falloff {
    /// Hermite smoothstep, `3t² - 2t³`
    #[default]
    Smooth,
    /// Raised cosine, `(1 - cos(πt)) / 2`
    Cosine,
    /// Quintic smootherstep, `6t⁵ - 15t⁴ + 10t³`
    Smoother,
}

impl Falloff {
    /// Weight for a vertex `distance` away from the edit centre
    pub fn weight(self, distance: f32, radius: f32) -> f32 {
        if radius <= 0.0 {
            return if distance <= 0.0 { 1.0 } else { 0.0 };
        }
        if distance >= radius {
            return 0.0;
        }
        // t = 1 at the centre, 0 at the rim
        let t = 1.0 - (distance.max(0.0) / radius);
        match self {
            Falloff::Smooth => t * t * (3.0 - 2.0 * t),
            Falloff::Cosine => 0.5 - 0.5 * (std::f32::consts::PI * t).cos(),
            Falloff::Smoother => t * t * t * (t * (t * 6.0 - 15.0) + 10.0),
        }
    }
}
