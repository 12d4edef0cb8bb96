//! Square spatial buckets on the XZ plane.

use delve_render::{LightId, NodeId};
use glam::Vec3;
use rustc_hash::FxHashSet;

/// Integer chunk coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChunkKey {
    pub x: i32,
    pub z: i32,
}

impl ChunkKey {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Chunk holding the world-space `position` for chunks `size` units wide.
    pub fn from_world(position: Vec3, size: f32) -> Self {
        Self {
            x: (position.x / size).floor() as i32,
            z: (position.z / size).floor() as i32,
        }
    }

    /// World-space anchor of the chunk: its coordinates scaled by `size`, at `y = 0`.
    pub fn center(self, size: f32) -> Vec3 {
        Vec3::new(self.x as f32 * size, 0.0, self.z as f32 * size)
    }
}

/// Member lights and objects of one chunk plus its activity flag.
#[derive(Clone, Debug, PartialEq)]
pub struct Chunk {
    pub key: ChunkKey,
    pub lights: FxHashSet<LightId>,
    pub objects: FxHashSet<NodeId>,
    pub active: bool,
}

impl Chunk {
    /// Empty, inactive chunk.
    pub fn new(key: ChunkKey) -> Self {
        Self {
            key,
            lights: FxHashSet::default(),
            objects: FxHashSet::default(),
            active: false,
        }
    }
}
