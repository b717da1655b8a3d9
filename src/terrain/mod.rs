//! Riverbed terrain synthesis on a regular grid

pub mod align;
pub mod channel;
pub mod classify;
pub mod displace;
pub mod grid;
pub mod rocks;
pub mod sculpt;
pub mod trim;

pub use align::{AlignReport, BoundaryAligner};
pub use channel::{Channel, ChannelParams, WaterlineGenerator};
pub use classify::{classify, RegionIndexSets, RegionWarning};
pub use displace::FalloffDisplacer;
pub use grid::{GridEpoch, MeshData, TerrainGrid, Vertex};
pub use rocks::{scatter_rocks, RockParams, RockPlacement};
pub use sculpt::{dig_riverbed, raise_riverbank, DigParams, RaiseParams};
pub use trim::{trim, TrimReport};
