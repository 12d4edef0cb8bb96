//! Room-and-corridor growth from a central hub, retried until enough
//! structures fit on the grid.

use std::collections::VecDeque;
use std::ops::RangeInclusive;

use delve_config::GeneratorConfig;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHashSet;

use crate::map::DungeonMap;
use crate::structure::{Direction, Rect, StructureId, StructureKind};
use crate::walls;

/// Edge length of the square hub placed at the grid center.
pub const HUB_SIZE: i32 = 3;
/// Corridor lengths drawn during growth.
pub const CORRIDOR_LENGTH: RangeInclusive<i32> = 3..=5;
/// Room widths and heights drawn during growth.
pub const ROOM_SIZE: RangeInclusive<i32> = 3..=5;

/// Branches tried per room while far from the target count.
const WIDE_BRANCHING: u32 = 4;
/// Branch counts tried per room once close to the target count.
const NARROW_BRANCHING: RangeInclusive<u32> = 2..=3;
/// Remaining-structure count above which rooms branch four ways.
const WIDE_BRANCHING_THRESHOLD: usize = 10;

/// Tunables for [`MapGenerator`].
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratorParams {
    pub width: u32,
    pub height: u32,
    /// Structures (hub, rooms, halls) an attempt must place to succeed.
    pub min_structures: usize,
    pub max_attempts: u32,
    /// Longest straight gap bridged by an alternate hall.
    pub max_alt_hall_gap: i32,
    /// Largest center offset between two rooms joined by an alternate hall.
    pub max_alt_hall_misalignment: i32,
}

impl Default for GeneratorParams {
    fn default() -> Self {
        Self::from(&GeneratorConfig::default())
    }
}

impl From<&GeneratorConfig> for GeneratorParams {
    fn from(config: &GeneratorConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            min_structures: config.min_structures as usize,
            max_attempts: config.max_attempts,
            max_alt_hall_gap: config.max_alt_hall_gap as i32,
            max_alt_hall_misalignment: config.max_alt_hall_misalignment as i32,
        }
    }
}

/// Result of [`MapGenerator::generate`].
///
/// Running out of attempts is not an error: `complete` is `false` and `map`
/// holds the last, incomplete attempt.
#[derive(Clone, Debug)]
pub struct GenerationOutcome {
    pub map: DungeonMap,
    /// Attempts made, including the successful one.
    pub attempts: u32,
    /// Structures placed by growth in the returned map (alternate halls excluded).
    pub placed: usize,
    /// `true` when `placed` reached the minimum.
    pub complete: bool,
}

impl GenerationOutcome {
    /// The generated map, or [`DungeonMap::fallback`] if generation fell short.
    pub fn into_map_or_fallback(self) -> DungeonMap {
        if self.complete {
            self.map
        } else {
            DungeonMap::fallback()
        }
    }
}

/// Grows a hub-and-spoke dungeon layout from an explicit random source.
pub struct MapGenerator<R = ChaCha8Rng> {
    params: GeneratorParams,
    rng: R,
}

impl MapGenerator<ChaCha8Rng> {
    /// Generator over a ChaCha8 stream seeded with `seed`; equal seeds give equal maps.
    pub fn seeded(params: GeneratorParams, seed: u64) -> Self {
        Self::new(params, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> MapGenerator<R> {
    pub fn new(params: GeneratorParams, rng: R) -> Self {
        Self { params, rng }
    }

    pub fn params(&self) -> &GeneratorParams {
        &self.params
    }

    /// Run attempts until one places `min_structures`, or attempts run out.
    pub fn generate(&mut self) -> GenerationOutcome {
        let mut map = DungeonMap::new(self.params.width, self.params.height);
        let mut placed = 0;

        for attempt in 1..=self.params.max_attempts {
            (map, placed) = self.attempt();
            if placed >= self.params.min_structures {
                log::info!(
                    "Generated {}x{} layout: {} structures ({} placed by growth) on attempt {}",
                    self.params.width,
                    self.params.height,
                    map.structure_count(),
                    placed,
                    attempt
                );
                return GenerationOutcome {
                    map,
                    attempts: attempt,
                    placed,
                    complete: true,
                };
            }
            log::debug!(
                "Attempt {attempt} placed {placed}/{} structures, retrying",
                self.params.min_structures
            );
        }

        log::warn!(
            "Layout generation gave up after {} attempts: {}/{} structures placed",
            self.params.max_attempts,
            placed,
            self.params.min_structures
        );
        GenerationOutcome {
            map,
            attempts: self.params.max_attempts,
            placed,
            complete: false,
        }
    }

    /// One full attempt on a fresh grid. Returns the map and the growth count.
    fn attempt(&mut self) -> (DungeonMap, usize) {
        let mut map = DungeonMap::new(self.params.width, self.params.height);
        let hub_rect = Rect::new(
            self.params.width as i32 / 2 - HUB_SIZE / 2,
            self.params.height as i32 / 2 - HUB_SIZE / 2,
            HUB_SIZE,
            HUB_SIZE,
        );
        let Some(hub) = map.try_place(StructureKind::Hub, hub_rect) else {
            return (map, 0);
        };

        let placed = self.grow(&mut map, hub);
        walls::add_alternate_halls(
            &mut map,
            self.params.max_alt_hall_gap,
            self.params.max_alt_hall_misalignment,
        );
        (map, placed)
    }

    /// Breadth-first growth: every room sprouts corridors, each ending in a new room.
    fn grow(&mut self, map: &mut DungeonMap, hub: StructureId) -> usize {
        let min = self.params.min_structures;
        let mut placed = 1;
        let mut queue = VecDeque::from([hub]);
        let mut processed = FxHashSet::default();

        while placed < min {
            let Some(source) = queue.pop_front() else {
                break;
            };
            if !processed.insert(source) {
                continue;
            }
            let Some(source_rect) = map.structure(source).map(|s| s.rect) else {
                continue;
            };

            let branches = if min - placed > WIDE_BRANCHING_THRESHOLD {
                WIDE_BRANCHING
            } else {
                self.rng.random_range(NARROW_BRANCHING)
            };

            for _ in 0..branches {
                let direction = Direction::ALL[self.rng.random_range(0..Direction::ALL.len())];
                let length = self.rng.random_range(CORRIDOR_LENGTH);
                let corridor = corridor_from(&source_rect, direction, length);
                if !map.grid().can_place(&corridor, StructureKind::Hall) {
                    continue;
                }

                let width = self.rng.random_range(ROOM_SIZE);
                let height = self.rng.random_range(ROOM_SIZE);
                let room = room_beyond(&corridor, direction, width, height);
                if !map.grid().can_place(&room, StructureKind::Room) {
                    continue;
                }

                let hall = map.insert(StructureKind::Hall, corridor);
                let new_room = map.insert(StructureKind::Room, room);
                map.connect(source, hall);
                map.connect(hall, new_room);
                queue.push_back(new_room);
                placed += 2;
            }
        }

        placed
    }
}

/// One-cell-wide corridor leaving `source` through the middle of its `direction` side.
pub(crate) fn corridor_from(source: &Rect, direction: Direction, length: i32) -> Rect {
    let (cx, cy) = source.center();
    match direction {
        Direction::North => Rect::new(cx, source.y - length, 1, length),
        Direction::South => Rect::new(cx, source.bottom(), 1, length),
        Direction::West => Rect::new(source.x - length, cy, length, 1),
        Direction::East => Rect::new(source.right(), cy, length, 1),
    }
}

/// Room centered on the corridor's axis, flush against its far end.
pub(crate) fn room_beyond(corridor: &Rect, direction: Direction, width: i32, height: i32) -> Rect {
    match direction {
        Direction::North => Rect::new(corridor.x - width / 2, corridor.y - height, width, height),
        Direction::South => Rect::new(corridor.x - width / 2, corridor.bottom(), width, height),
        Direction::West => Rect::new(corridor.x - width, corridor.y - height / 2, width, height),
        Direction::East => Rect::new(corridor.right(), corridor.y - height / 2, width, height),
    }
}
