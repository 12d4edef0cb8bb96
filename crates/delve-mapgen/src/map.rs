//! A generated layout: the grid plus the structures stamped onto it.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::grid::Grid;
use crate::structure::{Rect, Structure, StructureId, StructureKind};

/// Grid and structure list produced by one generation attempt.
///
/// `structures[i].id == StructureId(i)`; ids are handed out in placement order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DungeonMap {
    grid: Grid,
    structures: Vec<Structure>,
}

impl DungeonMap {
    /// An empty layout of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            grid: Grid::new(width, height),
            structures: Vec::new(),
        }
    }

    /// Small hand-made layout (hub, one hall, one room on a 15x15 grid) for
    /// callers that cannot use an incomplete generation result.
    pub fn fallback() -> Self {
        let mut map = Self::new(15, 15);
        if let Some(hub) = map.try_place(StructureKind::Hub, Rect::new(6, 6, 3, 3))
            && let Some(hall) = map.try_place(StructureKind::Hall, Rect::new(9, 7, 3, 1))
            && let Some(room) = map.try_place(StructureKind::Room, Rect::new(12, 6, 3, 3))
        {
            map.connect(hub, hall);
            map.connect(hall, room);
        }
        map
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn structures(&self) -> &[Structure] {
        &self.structures
    }

    pub fn structure(&self, id: StructureId) -> Option<&Structure> {
        self.structures.get(id.0 as usize)
    }

    pub fn structure_count(&self) -> usize {
        self.structures.len()
    }

    /// The starting hub, if one was placed.
    pub fn hub(&self) -> Option<&Structure> {
        self.structures
            .iter()
            .find(|s| s.kind == StructureKind::Hub)
    }

    /// Rooms and the hub, in placement order.
    pub fn rooms(&self) -> impl Iterator<Item = &Structure> {
        self.structures.iter().filter(|s| s.kind.is_room())
    }

    /// Halls and alternate halls, in placement order.
    pub fn halls(&self) -> impl Iterator<Item = &Structure> {
        self.structures.iter().filter(|s| s.kind.is_hall())
    }

    /// Number of structures reachable from the hub by following connections.
    pub fn reachable_from_hub(&self) -> usize {
        let Some(hub) = self.hub() else {
            return 0;
        };
        let mut seen = FxHashSet::default();
        let mut queue = VecDeque::from([hub.id]);
        seen.insert(hub.id);
        while let Some(id) = queue.pop_front() {
            let Some(structure) = self.structure(id) else {
                continue;
            };
            for &next in &structure.connections {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        seen.len()
    }

    /// Place a structure if the grid allows it, returning its new id.
    pub fn try_place(&mut self, kind: StructureKind, rect: Rect) -> Option<StructureId> {
        self.grid
            .can_place(&rect, kind)
            .then(|| self.insert(kind, rect))
    }

    /// Stamp a structure without checking legality.
    pub(crate) fn insert(&mut self, kind: StructureKind, rect: Rect) -> StructureId {
        debug_assert!(self.grid.can_place(&rect, kind), "{kind:?} at {rect:?}");
        let id = StructureId(self.structures.len() as u32);
        let structure = Structure::new(id, kind, rect);
        self.grid.stamp(&structure);
        self.structures.push(structure);
        id
    }

    /// Link two structures in both directions.
    pub(crate) fn connect(&mut self, a: StructureId, b: StructureId) {
        if let Some(s) = self.structures.get_mut(a.0 as usize) {
            s.connect(b);
        }
        if let Some(s) = self.structures.get_mut(b.0 as usize) {
            s.connect(a);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellKind;

    #[test]
    fn test_fallback_layout_is_connected() {
        let map = DungeonMap::fallback();
        assert_eq!(map.structure_count(), 3);
        assert_eq!(map.rooms().count(), 2);
        assert_eq!(map.halls().count(), 1);
        assert_eq!(map.reachable_from_hub(), 3);
        assert_eq!(map.grid().count(CellKind::Hub), 9);
        assert_eq!(map.grid().count(CellKind::Hall), 3);
    }

    #[test]
    fn test_try_place_rejects_overlap() {
        let mut map = DungeonMap::new(20, 20);
        let hub = map.try_place(StructureKind::Hub, Rect::new(8, 8, 3, 3));
        assert_eq!(hub, Some(StructureId(0)));
        assert!(map.try_place(StructureKind::Room, Rect::new(9, 9, 3, 3)).is_none());
        assert_eq!(map.structure_count(), 1);
    }

    #[test]
    fn test_connect_is_bidirectional() {
        let mut map = DungeonMap::fallback();
        let hub = map.hub().unwrap().id;
        let room = StructureId(2);
        map.connect(hub, room);
        assert!(map.structure(hub).unwrap().connections.contains(&room));
        assert!(map.structure(room).unwrap().connections.contains(&hub));
    }

    #[test]
    fn test_empty_map_has_nothing_reachable() {
        assert_eq!(DungeonMap::new(10, 10).reachable_from_hub(), 0);
    }
}
