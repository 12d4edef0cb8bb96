//! Procedural dungeon layouts: a grid of typed cells, rectangular structures
//! placed on it, and a seeded room-and-corridor generator.

mod cell;
mod generator;
mod grid;
mod map;
mod structure;
mod walls;

pub use cell::{Cell, CellKind};
pub use generator::{GenerationOutcome, GeneratorParams, MapGenerator};
pub use grid::Grid;
pub use map::DungeonMap;
pub use structure::{Direction, Rect, Structure, StructureId, StructureKind};
