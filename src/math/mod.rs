//! Numeric utilities shared by the curve, terrain and atmosphere modules

pub mod falloff;
pub mod interp;
pub mod spline;

pub use falloff::Falloff;
pub use interp::{dedup_first, interp_clamped, linspace};
pub use spline::CubicSpline;
