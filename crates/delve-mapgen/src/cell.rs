//! Grid cells.

use serde::Serialize;

use crate::structure::{StructureId, StructureKind};

/// What occupies a grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CellKind {
    /// Solid rock; nothing placed here.
    #[default]
    Empty,
    /// Floor of an ordinary room.
    Room,
    /// Floor of the starting hub.
    Hub,
    /// Corridor laid down while growing the layout.
    Hall,
    /// Shortcut corridor added after growth.
    AltHall,
}

impl CellKind {
    /// Halls and alternate halls.
    pub fn is_hall(self) -> bool {
        matches!(self, CellKind::Hall | CellKind::AltHall)
    }

    /// Rooms and the hub.
    pub fn is_room(self) -> bool {
        matches!(self, CellKind::Room | CellKind::Hub)
    }

    /// Single-character glyph used by the ASCII plan.
    pub fn glyph(self) -> char {
        match self {
            CellKind::Empty => ' ',
            CellKind::Room => '#',
            CellKind::Hub => '@',
            CellKind::Hall => '.',
            CellKind::AltHall => ':',
        }
    }
}

impl From<StructureKind> for CellKind {
    fn from(kind: StructureKind) -> Self {
        match kind {
            StructureKind::Room => CellKind::Room,
            StructureKind::Hub => CellKind::Hub,
            StructureKind::Hall => CellKind::Hall,
            StructureKind::AltHall => CellKind::AltHall,
        }
    }
}

/// One cell of the layout grid.
///
/// Cells are overwritten in place during generation and never removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub x: u32,
    pub y: u32,
    #[serde(rename = "type")]
    pub kind: CellKind,
    /// Structure whose footprint covers this cell, if any.
    #[serde(rename = "roomId")]
    pub structure: Option<StructureId>,
}

impl Cell {
    /// An empty cell at `(x, y)`.
    pub fn empty(x: u32, y: u32) -> Self {
        Self {
            x,
            y,
            kind: CellKind::Empty,
            structure: None,
        }
    }
}
