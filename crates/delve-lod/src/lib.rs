//! Level-of-detail and chunk visibility for dungeon scenes: distance-based
//! detail selection, stride decimation, material simplification, and
//! per-chunk point light budgets.

mod chunk;
mod controller;
mod decimate;
mod error;
mod level;
mod registry;

pub use chunk::{Chunk, ChunkKey};
pub use controller::{LodController, LodStats};
pub use decimate::{MIN_DECIMATED_VERTICES, decimate, target_vertex_count};
pub use error::LodError;
pub use level::{DEFAULT_LOD_LEVELS, LodLevel, LodOptions, select_detail};
pub use registry::LodRegistry;
