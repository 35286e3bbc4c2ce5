//! The placement engine: grows a [`Map`] room by room from an entry socket.
//!
//! The entry points are [`PlacementEngine::generate`] and
//! [`PlacementEngine::generate_observed`]. A run has two phases:
//!
//! 1. **Placement.** Open sockets are taken off the frontier one at a time. For
//!    each, the rooms containing that door type are ranked and the first room
//!    position that fits the map is committed. There is no backtracking.
//! 2. **Finalization.** Unresolved cells become walls, the first and last
//!    rejected sockets become the entrance and exit, then the cleanup and
//!    decoration rules rewrite the map.
//!
//! All randomness comes from the engine's own generator, consumed in a fixed
//! order, so a seeded engine reproduces the same map for the same catalogs.

use std::cmp::Reverse;

use rand::seq::SliceRandom;
use rand::Rng;
use roomforge_core::{pattern, Map, Position, TemplateCatalog, TemplateId, WILDCARD};
use roomforge_rules::{apply_cleanup, apply_decoration, RuleSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    DoorIndex, FrontierPolicy, GenerateError, GenerationObserver, NoopObserver, Placement, Socket,
    Stage,
};

// ─── Settings ─────────────────────────────────────────────────────────────────

/// Symbols and policy used by a generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// Written over every cell still unresolved after placement.
    pub wall: char,
    /// The symbol inside door templates that is swapped for the markers.
    pub connector: char,
    /// Entrance marker.
    pub up: char,
    /// Exit marker.
    pub down: char,
    pub policy: FrontierPolicy,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            wall: '#',
            connector: '=',
            up: 'U',
            down: 'D',
            policy: FrontierPolicy::default(),
        }
    }
}

// ─── Report ───────────────────────────────────────────────────────────────────

/// Summary of a finished run.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub entry: Socket,
    pub entrance: Position,
    pub exit: Position,
    /// Every committed room, in placement order.
    pub placements: Vec<Placement>,
    /// Sockets that could not be connected, in the order they were given up on.
    /// The entry is always first.
    pub rejected: Vec<Socket>,
    /// Number of frontier sockets processed.
    pub iterations: usize,
    pub cleanup_passes: u32,
    /// Number of decoration rules that replaced at least one match.
    pub decorations: usize,
}

/// Per-run bookkeeping.
#[derive(Debug, Default)]
struct RunState {
    frontier: Vec<Socket>,
    used: Vec<Placement>,
    rejected: Vec<Socket>,
}

// ─── Engine ───────────────────────────────────────────────────────────────────

/// Generates maps from a room catalog, a door catalog and a rule set.
///
/// The engine owns its random source. Room usage counters live in the owned
/// room catalog and keep accumulating across runs of the same engine.
pub struct PlacementEngine<R: Rng> {
    rooms: TemplateCatalog,
    doors: TemplateCatalog,
    rules: RuleSet,
    index: DoorIndex,
    settings: GenerationSettings,
    rng: R,
}

impl<R: Rng> PlacementEngine<R> {
    pub fn new(rooms: TemplateCatalog, doors: TemplateCatalog, rules: RuleSet, rng: R) -> Self {
        info!(
            "creating generator with {} rooms, {} door types, {} rules",
            rooms.len(),
            doors.len(),
            rules.len()
        );
        let index = DoorIndex::build(&rooms, &doors);
        Self {
            rooms,
            doors,
            rules,
            index,
            settings: GenerationSettings::default(),
            rng,
        }
    }

    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    pub fn rooms(&self) -> &TemplateCatalog {
        &self.rooms
    }

    pub fn doors(&self) -> &TemplateCatalog {
        &self.doors
    }

    pub fn index(&self) -> &DoorIndex {
        &self.index
    }

    /// Generate into `map`, starting from `entry` or from a random one.
    pub fn generate(
        &mut self,
        map: &mut Map,
        entry: Option<Socket>,
    ) -> Result<GenerationReport, GenerateError> {
        self.generate_observed(map, entry, &mut NoopObserver)
    }

    /// Like [`generate`](Self::generate), reporting a snapshot after every step.
    pub fn generate_observed(
        &mut self,
        map: &mut Map,
        entry: Option<Socket>,
        observer: &mut impl GenerationObserver,
    ) -> Result<GenerationReport, GenerateError> {
        info!("generating map {}x{}", map.width(), map.height());
        if self.doors.is_empty() {
            return Err(GenerateError::NoDoors);
        }
        if !self.any_room_fits(map) {
            return Err(GenerateError::MapTooSmall {
                width: map.width(),
                height: map.height(),
            });
        }

        let entry = match entry {
            Some(entry) => entry,
            None => self.random_entry(map)?,
        };
        let door = self
            .doors
            .find(entry.door)
            .ok_or(GenerateError::UnknownDoor(entry.door))?;

        let mut state = RunState::default();
        map.place(door, entry.position.x, entry.position.y);
        // the entry is never reused as a connector and always becomes the entrance
        state.frontier.push(entry);
        state.rejected.push(entry);
        observer.on_step(Stage::Entry, map.grid());

        let mut iterations = 0;
        while !state.frontier.is_empty() {
            let pick = self.select_socket(&state.frontier);
            let exit = state.frontier[pick];
            iterations += 1;

            if !self.place_room_for_socket(map, exit, &mut state) {
                state.frontier.retain(|s| *s != exit);
                state.rejected.push(exit);
            }
            debug_assert!(!state.frontier.contains(&exit));
            observer.on_step(Stage::Placement, map.grid());
        }
        info!(
            "placement done: {} rooms, {} rejected sockets, {} iterations",
            state.used.len(),
            state.rejected.len(),
            iterations
        );

        if state.used.is_empty() {
            return Err(GenerateError::NothingPlaced(entry));
        }

        map.replace_symbol(WILDCARD, self.settings.wall);
        observer.on_step(Stage::WallFill, map.grid());

        let (entrance, exit) = self.mark_entrance_and_exit(map, &state.rejected)?;
        observer.on_step(Stage::Markers, map.grid());

        let cleanup_passes = apply_cleanup(map, &self.rules, &mut self.rng, |m| {
            observer.on_step(Stage::Cleanup, m.grid())
        });
        let decorations = apply_decoration(map, &self.rules, &mut self.rng, |m| {
            observer.on_step(Stage::Decoration, m.grid())
        });

        Ok(GenerationReport {
            entry,
            entrance,
            exit,
            placements: state.used,
            rejected: state.rejected,
            iterations,
            cleanup_passes,
            decorations,
        })
    }

    // ─── Placement ────────────────────────────────────────────────────────────

    /// Pick a random door type and a position where a room holding it fits.
    ///
    /// One of the rooms containing the door is drawn together with one of its
    /// door occurrences, then the room's origin is drawn from the range that
    /// keeps it inside the map border. The entry sits on that occurrence, so
    /// the first room always has somewhere to go.
    fn random_entry(&mut self, map: &Map) -> Result<Socket, GenerateError> {
        let usable: Vec<TemplateId> = self
            .doors
            .iter()
            .map(|d| d.id())
            .filter(|&door| {
                self.index
                    .rooms_for(door)
                    .iter()
                    .any(|r| self.room_fits(map, r.room))
            })
            .collect();
        let Some(&door) = usable.choose(&mut self.rng) else {
            // rooms fit, but none of them carries a door
            return Err(GenerateError::MapTooSmall {
                width: map.width(),
                height: map.height(),
            });
        };

        let anchors: Vec<(usize, Position)> = self
            .index
            .rooms_for(door)
            .iter()
            .filter(|r| self.room_fits(map, r.room))
            .flat_map(|r| r.positions.iter().map(move |p| (r.room, *p)))
            .collect();
        let &(room_idx, pos) = anchors.choose(&mut self.rng).ok_or(GenerateError::NoDoors)?;
        let room = self.rooms.get(room_idx).ok_or(GenerateError::NoDoors)?;

        // origin + size must stay below width - 1
        let max_x = (map.width() - room.x_size() - 2) as i32;
        let max_y = (map.height() - room.y_size() - 2) as i32;
        let x = self.rng.gen_range(1..=max_x) + pos.x;
        let y = self.rng.gen_range(1..=max_y) + pos.y;
        debug!("random entry: door {} at ({}, {})", door, x, y);
        Ok(Socket::new(x, y, door))
    }

    fn select_socket(&mut self, frontier: &[Socket]) -> usize {
        match self.settings.policy {
            FrontierPolicy::BreadthFirst => 0,
            FrontierPolicy::DepthFirst => frontier.len() - 1,
            FrontierPolicy::Random => self.rng.gen_range(0..frontier.len()),
        }
    }

    /// Try to attach a room to `exit`. Returns `true` if one was committed.
    fn place_room_for_socket(&mut self, map: &mut Map, exit: Socket, state: &mut RunState) -> bool {
        let mut candidates: Vec<usize> = self
            .index
            .rooms_for(exit.door)
            .iter()
            .map(|r| r.room)
            .collect();
        shuffle_and_rank(&mut candidates, &self.rooms, &mut self.rng);

        for room_idx in candidates {
            let mut positions = self
                .index
                .rooms_for(exit.door)
                .iter()
                .find(|r| r.room == room_idx)
                .map(|r| r.positions.clone())
                .unwrap_or_default();
            positions.shuffle(&mut self.rng);

            for pos in positions {
                let origin = exit.position.offset(-pos.x, -pos.y);
                if self.check_room(map, room_idx, origin, &state.used) {
                    self.commit_room(map, room_idx, origin, state);
                    return true;
                }
            }
        }
        false
    }

    /// Whether room `room_idx` can go at `origin`.
    ///
    /// The room must stay at least one cell inside every map edge, must not
    /// repeat a placement of the same source at the same spot, and each of its
    /// cells must agree with the map wherever both are resolved.
    fn check_room(&self, map: &Map, room_idx: usize, origin: Position, used: &[Placement]) -> bool {
        let Some(room) = self.rooms.get(room_idx) else {
            return false;
        };
        if origin.x <= 0 || origin.y <= 0 {
            return false;
        }
        if origin.x as i64 + room.x_size() as i64 >= map.width() as i64 - 1
            || origin.y as i64 + room.y_size() as i64 >= map.height() as i64 - 1
        {
            return false;
        }
        if used
            .iter()
            .any(|u| u.position == origin && u.source == room.source_id())
        {
            return false;
        }
        pattern::matches_strict(map.grid(), room.content(), origin.x, origin.y)
    }

    fn commit_room(&mut self, map: &mut Map, room_idx: usize, origin: Position, state: &mut RunState) {
        let Some(room) = self.rooms.get(room_idx) else {
            return;
        };
        debug!("placing room {} at {}", room.id(), origin);
        map.place(room, origin.x, origin.y);
        let source = room.source_id();
        state.used.push(Placement {
            position: origin,
            room: room.id(),
            source,
        });

        // a socket already open is now shared by two rooms and therefore closed
        for &(door, pos) in self.index.sockets_in(room_idx) {
            let socket = Socket {
                position: origin.offset(pos.x, pos.y),
                door,
            };
            if state.frontier.contains(&socket) {
                state.frontier.retain(|s| *s != socket);
            } else {
                state.frontier.push(socket);
            }
        }

        self.rooms.record_usage(source);
    }

    /// Turn the first rejected socket into the entrance and the last into the exit.
    fn mark_entrance_and_exit(
        &self,
        map: &mut Map,
        rejected: &[Socket],
    ) -> Result<(Position, Position), GenerateError> {
        let (Some(&first), Some(&last)) = (rejected.first(), rejected.last()) else {
            return Err(GenerateError::NoDoors);
        };
        self.stamp_marker(map, first, self.settings.up)?;
        self.stamp_marker(map, last, self.settings.down)?;
        map.set_entrance(first.position);
        map.set_exit(last.position);
        info!("entrance at {}, exit at {}", first.position, last.position);
        Ok((first.position, last.position))
    }

    fn stamp_marker(&self, map: &mut Map, socket: Socket, marker: char) -> Result<(), GenerateError> {
        let door = self
            .doors
            .find(socket.door)
            .ok_or(GenerateError::UnknownDoor(socket.door))?;
        let mut content = door.content().clone();
        pattern::replace_symbol(&mut content, self.settings.connector, marker);
        pattern::place(map.grid_mut(), &content, socket.position.x, socket.position.y);
        Ok(())
    }

    /// Whether at least one room fits inside the map border.
    fn any_room_fits(&self, map: &Map) -> bool {
        (0..self.rooms.len()).any(|idx| self.room_fits(map, idx))
    }

    /// Whether room `room_idx` fits inside the map border somewhere.
    fn room_fits(&self, map: &Map, room_idx: usize) -> bool {
        self.rooms
            .get(room_idx)
            .is_some_and(|r| r.x_size() + 3 <= map.width() && r.y_size() + 3 <= map.height())
    }
}

// ─── Candidate ranking ────────────────────────────────────────────────────────

/// Shuffle the candidate rooms, then stable-sort them by descending
/// `sort_value - usage`. Big, rarely used rooms come first; the shuffle breaks
/// ties at random.
pub fn shuffle_and_rank(candidates: &mut [usize], rooms: &TemplateCatalog, rng: &mut impl Rng) {
    candidates.shuffle(rng);
    candidates.sort_by_key(|&idx| Reverse(room_score(rooms, idx)));
}

fn room_score(rooms: &TemplateCatalog, idx: usize) -> i64 {
    rooms
        .get(idx)
        .map(|r| r.sort_value() - r.usage() as i64)
        .unwrap_or(i64::MIN)
}

// ─── Tests ────────────────────────────────────────────────────────────────────
