//! Equirectangular UV to dome position, and the sun light derived from it

use std::f32::consts::{PI, TAU};
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::brightest::{find_brightest, BrightestPoint};
use super::hdri::HdriBuffer;

/// Light energy per unit of dome radius
pub const ENERGY_PER_RADIUS: f32 = 100.0;
/// Sun sits this fraction of the radius beyond the dome point on every axis
pub const SUN_OFFSET_FRACTION: f32 = 0.1;
/// Dome colour used when no environment map is available
pub const FALLBACK_COLOR: [f32; 3] = [0.2, 0.2, 0.8];

/// Height of the flattened dome floor
pub fn floor_z(radius: f32) -> f32 {
    -0.1 * radius
}

/// What to do with a direction that lands below the dome floor
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BelowHorizon {
    /// Reflect onto the upper hemisphere (`z = |z|`)
    #[default]
    Mirror,
    /// Leave the point where it is
    Keep,
}

/// Point on the dome plus the light energy for a dome of that radius
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DomeDirection {
    pub position: Vec3,
    pub radius: f32,
    pub energy: f32,
}

/// Map an equirectangular `(u, v)` onto a dome of `radius`, mirroring
/// below-horizon points upward.
pub fn uv_to_direction(u: f32, v: f32, radius: f32) -> DomeDirection {
    uv_to_direction_with(u, v, radius, BelowHorizon::Mirror)
}

/// Map `(u, v)` with an explicit below-horizon policy.
///
/// `u` is longitude `(0.5 - u) * 2π`, `v` is colatitude `v * π` (0 at the
/// zenith). The point is raised by `radius / 10` to sit above the floor.
pub fn uv_to_direction_with(u: f32, v: f32, radius: f32, below: BelowHorizon) -> DomeDirection {
    let longitude = (0.5 - u) * TAU;
    let colatitude = v * PI;
    let x = radius * colatitude.sin() * longitude.cos();
    let y = radius * colatitude.sin() * longitude.sin();
    let mut z = radius * colatitude.cos() + radius / 10.0;
    if z < 0.0 && below == BelowHorizon::Mirror {
        log::debug!("UV ({u:.3}, {v:.3}) falls below the horizon; mirroring z = {z:.2}");
        z = z.abs();
    }
    DomeDirection {
        position: Vec3::new(x, y, z),
        radius,
        energy: ENERGY_PER_RADIUS * radius,
    }
}

/// A directional light placed just outside the dome, aimed at its centre
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SunPlacement {
    pub position: Vec3,
    /// Unit vector from the dome point toward the origin
    pub direction: Vec3,
    pub energy: f32,
}

impl SunPlacement {
    pub fn from_direction(dome: &DomeDirection) -> Self {
        Self {
            position: dome.position + Vec3::splat(SUN_OFFSET_FRACTION * dome.radius),
            direction: (-dome.position).normalize_or_zero(),
            energy: dome.energy,
        }
    }
}

/// Where the environment light came from
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LightSource {
    Hdri { path: String },
    /// No usable map: flat dome colour, light at the dome centre UV
    Fallback { color: [f32; 3], reason: String },
}

/// Sun light estimated from an environment map
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EnvironmentLight {
    pub source: LightSource,
    pub brightest: BrightestPoint,
    pub dome: DomeDirection,
    pub sun: SunPlacement,
}

impl EnvironmentLight {
    /// Analyse an already loaded buffer
    pub fn from_buffer(buffer: &HdriBuffer, source: LightSource, radius: f32, below: BelowHorizon) -> Self {
        let brightest = find_brightest(buffer);
        Self::at(brightest, source, radius, below)
    }

    /// Load and analyse `path`. A missing or unreadable file gives the flat
    /// fallback light instead of an error.
    pub fn from_path(path: Option<&Path>, radius: f32, below: BelowHorizon) -> Self {
        let Some(path) = path else {
            return Self::fallback("no HDRI path configured", radius, below);
        };
        match HdriBuffer::load(path) {
            Ok(buffer) => {
                let source = LightSource::Hdri {
                    path: path.display().to_string(),
                };
                Self::from_buffer(&buffer, source, radius, below)
            }
            Err(e) => {
                log::warn!("Could not load HDRI {}: {}; using fallback light", path.display(), e);
                Self::fallback(&e.to_string(), radius, below)
            }
        }
    }

    /// Flat light at the dome centre UV with zero brightness
    pub fn fallback(reason: &str, radius: f32, below: BelowHorizon) -> Self {
        let source = LightSource::Fallback {
            color: FALLBACK_COLOR,
            reason: reason.to_string(),
        };
        Self::at(BrightestPoint::fallback(), source, radius, below)
    }

    fn at(brightest: BrightestPoint, source: LightSource, radius: f32, below: BelowHorizon) -> Self {
        let dome = uv_to_direction_with(brightest.u, brightest.v, radius, below);
        let sun = SunPlacement::from_direction(&dome);
        log::info!(
            "Sun at ({:.2}, {:.2}, {:.2}), energy {}",
            sun.position.x,
            sun.position.y,
            sun.position.z,
            sun.energy
        );
        Self {
            source,
            brightest,
            dome,
            sun,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.source, LightSource::Fallback { .. })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
