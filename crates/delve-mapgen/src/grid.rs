//! Fixed-size 2D grid of typed cells and the placement legality rules.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::cell::{Cell, CellKind};
use crate::structure::{Rect, Structure, StructureKind};

/// Halo kept around rooms and the hub during placement.
pub const ROOM_HALO: i32 = 1;

/// Row-major grid of [`Cell`]s. Its size never changes after construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl Grid {
    /// A grid of `width * height` empty cells.
    pub fn new(width: u32, height: u32) -> Self {
        let cells = (0..height)
            .flat_map(|y| (0..width).map(move |x| Cell::empty(x, y)))
            .collect();
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    /// `true` if every cell of `rect` lies inside the grid.
    pub fn contains_rect(&self, rect: &Rect) -> bool {
        rect.width > 0
            && rect.height > 0
            && self.in_bounds(rect.x, rect.y)
            && self.in_bounds(rect.right() - 1, rect.bottom() - 1)
    }

    pub fn get(&self, x: i32, y: i32) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Cell kind at `(x, y)`, or `None` outside the grid.
    pub fn kind_at(&self, x: i32, y: i32) -> Option<CellKind> {
        self.get(x, y).map(|cell| cell.kind)
    }

    /// Whether a structure of `kind` may occupy `rect`.
    ///
    /// The footprint must be in bounds. Room and hub footprints need empty
    /// cells and a halo of empty or hall cells, so two rooms never touch.
    /// Hall footprints may cross empty or hall cells and have no halo.
    pub fn can_place(&self, rect: &Rect, kind: StructureKind) -> bool {
        if !self.contains_rect(rect) {
            return false;
        }

        if kind.is_hall() {
            return rect.cells().all(|(x, y)| {
                self.kind_at(x, y)
                    .is_some_and(|k| k == CellKind::Empty || k.is_hall())
            });
        }

        let footprint_clear = rect
            .cells()
            .all(|(x, y)| self.kind_at(x, y) == Some(CellKind::Empty));
        footprint_clear
            && rect
                .expanded(ROOM_HALO)
                .cells()
                .filter(|&(x, y)| !rect.contains(x, y))
                .all(|(x, y)| match self.kind_at(x, y) {
                    None => true,
                    Some(k) => k == CellKind::Empty || k.is_hall(),
                })
    }

    /// Write `structure`'s kind and id into every cell of its footprint.
    ///
    /// Cells outside the grid are skipped; callers check [`Grid::can_place`] first.
    pub fn stamp(&mut self, structure: &Structure) {
        let kind = CellKind::from(structure.kind);
        for (x, y) in structure.rect.cells() {
            if let Some(i) = self.index(x, y) {
                self.cells[i].kind = kind;
                self.cells[i].structure = Some(structure.id);
            }
        }
    }

    /// Number of cells of the given kind.
    pub fn count(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|c| c.kind == kind).count()
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Rows of cells, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width.max(1) as usize)
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.in_bounds(x, y)
            .then(|| y as usize * self.width as usize + x as usize)
    }
}

impl fmt::Display for Grid {
    /// ASCII plan: one character per cell, one line per row.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            let line: String = row.iter().map(|c| c.kind.glyph()).collect();
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}

impl Serialize for Grid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct GridView<'a> {
            width: u32,
            height: u32,
            cells: Vec<&'a [Cell]>,
        }

        GridView {
            width: self.width,
            height: self.height,
            cells: self.rows().collect(),
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::StructureId;

    fn place(grid: &mut Grid, id: u32, kind: StructureKind, rect: Rect) {
        assert!(grid.can_place(&rect, kind), "{kind:?} at {rect:?}");
        grid.stamp(&Structure::new(StructureId(id), kind, rect));
    }

    #[test]
    fn test_new_grid_is_empty() {
        let grid = Grid::new(7, 5);
        assert_eq!(grid.cells().count(), 35);
        assert_eq!(grid.count(CellKind::Empty), 35);
        assert_eq!(grid.get(6, 4).map(|c| (c.x, c.y)), Some((6, 4)));
        assert!(grid.get(7, 0).is_none());
        assert!(grid.get(-1, 0).is_none());
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let grid = Grid::new(10, 10);
        assert!(!grid.can_place(&Rect::new(8, 8, 3, 3), StructureKind::Room));
        assert!(!grid.can_place(&Rect::new(-1, 4, 3, 1), StructureKind::Hall));
        assert!(grid.can_place(&Rect::new(7, 7, 3, 3), StructureKind::Room));
    }

    #[test]
    fn test_rooms_cannot_touch() {
        let mut grid = Grid::new(20, 20);
        place(&mut grid, 0, StructureKind::Hub, Rect::new(5, 5, 3, 3));
        // Directly adjacent: inside the hub's halo.
        assert!(!grid.can_place(&Rect::new(8, 5, 3, 3), StructureKind::Room));
        // One empty column between them is enough.
        assert!(grid.can_place(&Rect::new(9, 5, 3, 3), StructureKind::Room));
    }

    #[test]
    fn test_room_halo_may_overlap_hall() {
        let mut grid = Grid::new(20, 20);
        place(&mut grid, 0, StructureKind::Hub, Rect::new(5, 5, 3, 3));
        place(&mut grid, 1, StructureKind::Hall, Rect::new(8, 6, 3, 1));
        place(&mut grid, 2, StructureKind::Room, Rect::new(11, 5, 3, 3));
        assert_eq!(grid.count(CellKind::Hall), 3);
        assert_eq!(grid.count(CellKind::Room), 9);
    }

    #[test]
    fn test_halls_may_cross_halls_but_not_rooms() {
        let mut grid = Grid::new(20, 20);
        place(&mut grid, 0, StructureKind::Hall, Rect::new(2, 5, 5, 1));
        assert!(grid.can_place(&Rect::new(4, 3, 1, 5), StructureKind::Hall));
        place(&mut grid, 1, StructureKind::Room, Rect::new(10, 10, 3, 3));
        assert!(!grid.can_place(&Rect::new(11, 8, 1, 4), StructureKind::Hall));
        // A room footprint never covers an existing hall.
        assert!(!grid.can_place(&Rect::new(2, 4, 3, 3), StructureKind::Room));
    }

    #[test]
    fn test_stamp_writes_kind_and_id() {
        let mut grid = Grid::new(10, 10);
        place(&mut grid, 3, StructureKind::AltHall, Rect::new(1, 1, 1, 4));
        let cell = grid.get(1, 4).unwrap();
        assert_eq!(cell.kind, CellKind::AltHall);
        assert_eq!(cell.structure, Some(StructureId(3)));
        assert_eq!(grid.get(1, 5).unwrap().structure, None);
    }

    #[test]
    fn test_display_draws_plan() {
        let mut grid = Grid::new(6, 3);
        place(&mut grid, 0, StructureKind::Hall, Rect::new(0, 1, 2, 1));
        place(&mut grid, 1, StructureKind::AltHall, Rect::new(2, 1, 1, 1));
        assert_eq!(grid.to_string(), "\n..:\n\n");
    }

    #[test]
    fn test_serializes_as_rows() {
        let grid = Grid::new(3, 2);
        let value = serde_json::to_value(&grid).unwrap();
        assert_eq!(value["width"], 3);
        assert_eq!(value["cells"].as_array().unwrap().len(), 2);
        assert_eq!(value["cells"][1][2]["x"], 2);
        assert_eq!(value["cells"][1][2]["type"], "empty");
    }
}
