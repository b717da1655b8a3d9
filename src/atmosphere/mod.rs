//! Environment-map lighting for the scene dome.
//!
//! An [`HdriBuffer`] is scanned for its brightest 4x4 neighbourhood by
//! [`find_brightest`]; the winning UV is projected onto the dome with
//! [`uv_to_direction`], and [`EnvironmentLight`] turns that into a sun
//! placement. Missing or unreadable maps degrade to a flat fallback light.

pub mod brightest;
pub mod dome;
pub mod hdri;

// Re-exports
pub use brightest::{find_brightest, BrightestPoint};
pub use dome::{
    floor_z, uv_to_direction, uv_to_direction_with, BelowHorizon, DomeDirection, EnvironmentLight,
    LightSource, SunPlacement,
};
pub use hdri::{HdriBuffer, Orientation};
