//! Wall analysis: after growth, bridge facing room walls that have no
//! corridor yet with short straight alternate halls.

use crate::map::DungeonMap;
use crate::structure::{Direction, Rect, StructureId, StructureKind};

/// Add alternate halls between rooms whose free walls face each other across
/// a gap of at most `max_gap` cells with centers at most `max_misalignment`
/// cells apart. Returns the number of halls added.
pub(crate) fn add_alternate_halls(
    map: &mut DungeonMap,
    max_gap: i32,
    max_misalignment: i32,
) -> usize {
    let rooms: Vec<StructureId> = map.rooms().map(|s| s.id).collect();
    let mut added = 0;

    for &room in &rooms {
        for side in Direction::ALL {
            if !is_side_free(map, room, side) {
                continue;
            }
            let Some((partner, rect)) =
                find_partner(map, &rooms, room, side, max_gap, max_misalignment)
            else {
                continue;
            };
            if let Some(alt) = map.try_place(StructureKind::AltHall, rect) {
                map.connect(room, alt);
                map.connect(partner, alt);
                added += 1;
            }
        }
    }

    if added > 0 {
        log::debug!("Wall analysis added {added} alternate halls");
    }
    added
}

/// `true` if no hall connected to `room` leaves through its `side` wall.
pub(crate) fn is_side_free(map: &DungeonMap, room: StructureId, side: Direction) -> bool {
    let Some(room) = map.structure(room) else {
        return false;
    };
    room.connections
        .iter()
        .filter_map(|&id| map.structure(id))
        .filter(|s| s.kind.is_hall())
        .all(|hall| room.rect.side_towards(&hall.rect) != Some(side))
}

/// First room (in placement order) whose opposite wall is free and lines up
/// with `room`'s `side` wall, plus the hall rectangle that would join them.
fn find_partner(
    map: &DungeonMap,
    rooms: &[StructureId],
    room: StructureId,
    side: Direction,
    max_gap: i32,
    max_misalignment: i32,
) -> Option<(StructureId, Rect)> {
    let a = map.structure(room)?.rect;

    rooms.iter().copied().filter(|&other| other != room).find_map(|other| {
        let b = map.structure(other)?.rect;
        let rect = bridge(&a, &b, side, max_gap, max_misalignment)?;
        is_side_free(map, other, side.opposite()).then_some((other, rect))
    })
}

/// Straight one-cell-wide hall from `a`'s `side` wall to `b`, if `b` lies
/// within reach on that side and the two walls overlap.
pub(crate) fn bridge(
    a: &Rect,
    b: &Rect,
    side: Direction,
    max_gap: i32,
    max_misalignment: i32,
) -> Option<Rect> {
    let gap = match side {
        Direction::East => b.x - a.right(),
        Direction::West => a.x - b.right(),
        Direction::South => b.y - a.bottom(),
        Direction::North => a.y - b.bottom(),
    };
    if gap < 1 || gap > max_gap {
        return None;
    }

    let ((a_cx, a_cy), (b_cx, b_cy)) = (a.center(), b.center());
    if side.is_horizontal() {
        if (a_cy - b_cy).abs() > max_misalignment {
            return None;
        }
        let (lo, hi) = (a.y.max(b.y), a.bottom().min(b.bottom()));
        if lo >= hi {
            return None;
        }
        let row = (lo + hi - 1) / 2;
        let x = if side == Direction::East { a.right() } else { b.right() };
        Some(Rect::new(x, row, gap, 1))
    } else {
        if (a_cx - b_cx).abs() > max_misalignment {
            return None;
        }
        let (lo, hi) = (a.x.max(b.x), a.right().min(b.right()));
        if lo >= hi {
            return None;
        }
        let column = (lo + hi - 1) / 2;
        let y = if side == Direction::South { a.bottom() } else { b.bottom() };
        Some(Rect::new(column, y, 1, gap))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellKind;

    #[test]
    fn test_bridge_east_between_aligned_rooms() {
        let a = Rect::new(2, 2, 3, 3);
        let b = Rect::new(9, 3, 4, 3);
        let hall = bridge(&a, &b, Direction::East, 6, 2).unwrap();
        assert_eq!(hall, Rect::new(5, 3, 4, 1));
        assert_eq!(hall.right(), b.x);
    }

    #[test]
    fn test_bridge_respects_gap_and_misalignment() {
        let a = Rect::new(2, 2, 3, 3);
        // Gap of 7 is too long.
        assert!(bridge(&a, &Rect::new(12, 2, 3, 3), Direction::East, 6, 2).is_none());
        // Centers three rows apart.
        assert!(bridge(&a, &Rect::new(8, 5, 3, 3), Direction::East, 6, 2).is_none());
        // Wrong side.
        assert!(bridge(&a, &Rect::new(8, 2, 3, 3), Direction::West, 6, 2).is_none());
    }

    #[test]
    fn test_bridge_north_uses_shared_columns() {
        let a = Rect::new(10, 10, 3, 3);
        let b = Rect::new(11, 2, 5, 5);
        let hall = bridge(&a, &b, Direction::North, 6, 2).unwrap();
        assert_eq!(hall, Rect::new(11, 7, 1, 3));
        assert_eq!(hall.bottom(), a.y);
        assert_eq!(hall.y, b.bottom());
    }

    #[test]
    fn test_connects_facing_free_walls() {
        let mut map = DungeonMap::new(30, 30);
        let a = map.try_place(StructureKind::Hub, Rect::new(5, 5, 3, 3)).unwrap();
        let b = map.try_place(StructureKind::Room, Rect::new(12, 5, 3, 3)).unwrap();

        let added = add_alternate_halls(&mut map, 6, 2);
        assert_eq!(added, 1);

        let alt = map.halls().next().unwrap();
        assert_eq!(alt.kind, StructureKind::AltHall);
        assert_eq!(alt.rect, Rect::new(8, 6, 4, 1));
        assert!(map.structure(a).unwrap().connections.contains(&alt.id));
        assert!(map.structure(b).unwrap().connections.contains(&alt.id));
        assert!(!is_side_free(&map, a, Direction::East));
        assert!(!is_side_free(&map, b, Direction::West));
        assert_eq!(map.grid().count(CellKind::AltHall), 4);
    }

    #[test]
    fn test_used_wall_is_not_bridged_again() {
        let mut map = DungeonMap::new(30, 30);
        let a = map.try_place(StructureKind::Hub, Rect::new(5, 5, 3, 3)).unwrap();
        let hall = map.try_place(StructureKind::Hall, Rect::new(8, 6, 4, 1)).unwrap();
        let b = map.try_place(StructureKind::Room, Rect::new(12, 5, 3, 3)).unwrap();
        map.connect(a, hall);
        map.connect(hall, b);

        assert_eq!(add_alternate_halls(&mut map, 6, 2), 0);
        assert_eq!(map.structure_count(), 3);
    }

    #[test]
    fn test_blocked_bridge_is_skipped() {
        let mut map = DungeonMap::new(40, 40);
        map.try_place(StructureKind::Hub, Rect::new(5, 10, 3, 3)).unwrap();
        // Off-center room sitting on the straight run between the other two.
        map.try_place(StructureKind::Room, Rect::new(10, 11, 1, 3)).unwrap();
        map.try_place(StructureKind::Room, Rect::new(13, 10, 3, 3)).unwrap();

        assert_eq!(add_alternate_halls(&mut map, 6, 0), 0);
        assert_eq!(map.halls().count(), 0);
    }
}
