//! Rivergen - riverbed terrain synthesis and HDRI sun estimation
//!
//! Builds a meandering river channel on a regular terrain grid (waterlines,
//! bed/bank classification, proportional digging and raising, seamless
//! perimeter), a trimmed water plane and scattered rocks, and estimates a
//! sun direction from the brightest region of an equirectangular
//! environment map.

pub mod core;
pub mod math;
pub mod curve;
pub mod terrain;
pub mod atmosphere;
pub mod generation;
