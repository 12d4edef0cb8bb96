//! Rectangular structures (hub, rooms, halls) and the geometry helpers the
//! generator uses to place and connect them.

use serde::Serialize;

/// Identifier of a placed structure, unique within one generated map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct StructureId(pub u32);

impl std::fmt::Display for StructureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "s{}", self.0)
    }
}

/// Type tag of a structure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StructureKind {
    Room,
    Hub,
    Hall,
    AltHall,
}

impl StructureKind {
    /// Rooms and the hub; these carry a one-cell halo during placement.
    pub fn is_room(self) -> bool {
        matches!(self, StructureKind::Room | StructureKind::Hub)
    }

    /// Primary and alternate corridors.
    pub fn is_hall(self) -> bool {
        matches!(self, StructureKind::Hall | StructureKind::AltHall)
    }
}

/// Cardinal direction on the grid. North is towards decreasing `y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// All four directions in clockwise order starting at north.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// Unit step `(dx, dy)` for this direction.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }

    /// `true` for east and west.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::East | Direction::West)
    }
}

/// Axis-aligned rectangle in cell coordinates. `x`/`y` is the top-left cell.
///
/// Coordinates are signed so that candidate rectangles may hang off the grid
/// before the bounds check rejects them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// One past the rightmost column.
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// One past the bottom row.
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Center cell, rounding towards the top-left.
    pub fn center(&self) -> (i32, i32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }

    /// The rectangle grown by `margin` cells on every side.
    pub fn expanded(&self, margin: i32) -> Self {
        Self::new(
            self.x - margin,
            self.y - margin,
            self.width + 2 * margin,
            self.height + 2 * margin,
        )
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Every cell covered by the rectangle, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + use<> {
        let (x0, x1, y0, y1) = (self.x, self.right(), self.y, self.bottom());
        (y0..y1).flat_map(move |y| (x0..x1).map(move |x| (x, y)))
    }

    /// The side of `self` beyond which `other` lies entirely, if any.
    ///
    /// Vertical separation is checked first, so a rectangle that is both above
    /// and to the left reports [`Direction::North`].
    pub fn side_towards(&self, other: &Rect) -> Option<Direction> {
        if other.bottom() <= self.y {
            Some(Direction::North)
        } else if other.y >= self.bottom() {
            Some(Direction::South)
        } else if other.right() <= self.x {
            Some(Direction::West)
        } else if other.x >= self.right() {
            Some(Direction::East)
        } else {
            None
        }
    }
}

/// A placed rectangle with a type tag and its links to neighbouring structures.
///
/// Geometry is fixed once placed; `connections` only ever grows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Structure {
    pub id: StructureId,
    pub kind: StructureKind,
    pub rect: Rect,
    pub connections: Vec<StructureId>,
}

impl Structure {
    pub fn new(id: StructureId, kind: StructureKind, rect: Rect) -> Self {
        Self {
            id,
            kind,
            rect,
            connections: Vec::new(),
        }
    }

    /// Record a link to `other`, ignoring duplicates.
    pub fn connect(&mut self, other: StructureId) {
        if !self.connections.contains(&other) {
            self.connections.push(other);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposites_round_trip() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            let (dx, dy) = dir.offset();
            let (ox, oy) = dir.opposite().offset();
            assert_eq!((dx + ox, dy + oy), (0, 0));
        }
    }

    #[test]
    fn test_rect_cells_cover_area() {
        let rect = Rect::new(-1, 2, 3, 4);
        let cells: Vec<_> = rect.cells().collect();
        assert_eq!(cells.len(), 12);
        assert_eq!(cells.first(), Some(&(-1, 2)));
        assert_eq!(cells.last(), Some(&(1, 5)));
        assert!(cells.iter().all(|&(x, y)| rect.contains(x, y)));
    }

    #[test]
    fn test_rect_center_rounds_down() {
        assert_eq!(Rect::new(10, 10, 3, 3).center(), (11, 11));
        assert_eq!(Rect::new(10, 10, 4, 5).center(), (12, 12));
    }

    #[test]
    fn test_expanded_halo_touches_neighbour() {
        let a = Rect::new(0, 0, 3, 3);
        let b = Rect::new(3, 0, 3, 3);
        assert!(!a.intersects(&b));
        assert!(a.expanded(1).intersects(&b));
        assert!(!a.expanded(1).intersects(&Rect::new(4, 0, 3, 3)));
    }

    #[test]
    fn test_side_towards() {
        let room = Rect::new(10, 10, 3, 3);
        assert_eq!(
            room.side_towards(&Rect::new(11, 5, 1, 5)),
            Some(Direction::North)
        );
        assert_eq!(
            room.side_towards(&Rect::new(11, 13, 1, 3)),
            Some(Direction::South)
        );
        assert_eq!(
            room.side_towards(&Rect::new(13, 11, 4, 1)),
            Some(Direction::East)
        );
        assert_eq!(
            room.side_towards(&Rect::new(6, 11, 4, 1)),
            Some(Direction::West)
        );
        assert_eq!(room.side_towards(&Rect::new(11, 11, 1, 1)), None);
    }

    #[test]
    fn test_connect_ignores_duplicates() {
        let mut s = Structure::new(StructureId(0), StructureKind::Hub, Rect::new(0, 0, 3, 3));
        s.connect(StructureId(1));
        s.connect(StructureId(1));
        s.connect(StructureId(2));
        assert_eq!(s.connections, vec![StructureId(1), StructureId(2)]);
    }
}
