//! Lookup from door type to the rooms that contain it

use std::collections::HashMap;

use roomforge_core::{Position, TemplateCatalog, TemplateId};
use tracing::info;

/// A room that contains a given door, with every position of that door inside it.
#[derive(Debug, Clone)]
pub struct RoomSockets {
    /// Index of the room in the room catalog
    pub room: usize,
    pub positions: Vec<Position>,
}

/// Rooms grouped by the doors they contain.
///
/// Built once from the two catalogs. Rooms are matched as they are: the
/// catalog is expected to already hold every orientation it wants to use.
#[derive(Debug, Clone, Default)]
pub struct DoorIndex {
    by_door: HashMap<TemplateId, Vec<RoomSockets>>,
    /// Every door occurrence per room (indexed like the room catalog), in door catalog order
    by_room: Vec<Vec<(TemplateId, Position)>>,
}

impl DoorIndex {
    pub fn build(rooms: &TemplateCatalog, doors: &TemplateCatalog) -> Self {
        let mut by_door: HashMap<TemplateId, Vec<RoomSockets>> = HashMap::new();
        let mut by_room: Vec<Vec<(TemplateId, Position)>> = vec![Vec::new(); rooms.len()];

        for door in doors {
            let entry = by_door.entry(door.id()).or_default();
            for (room_idx, room) in rooms.iter().enumerate() {
                let positions = door.occurrences_in(room.content());
                if positions.is_empty() {
                    continue;
                }
                by_room[room_idx].extend(positions.iter().map(|p| (door.id(), *p)));
                entry.push(RoomSockets {
                    room: room_idx,
                    positions,
                });
            }
            info!("door {} fits {} rooms", door.id(), entry.len());
        }

        Self { by_door, by_room }
    }

    /// Rooms containing the given door type. Empty for unknown doors.
    pub fn rooms_for(&self, door: TemplateId) -> &[RoomSockets] {
        self.by_door.get(&door).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All door occurrences inside a room, by room catalog index.
    pub fn sockets_in(&self, room: usize) -> &[(TemplateId, Position)] {
        self.by_room.get(room).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Largest number of door occurrences in any single room.
    pub fn max_sockets_per_room(&self) -> usize {
        self.by_room.iter().map(Vec::len).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomforge_core::{Grid, IdAllocator, Template};

    fn catalog(name: &str, patterns: &[&[&str]], ids: &mut IdAllocator) -> TemplateCatalog {
        let mut catalog = TemplateCatalog::new(name);
        for rows in patterns {
            catalog.insert(Template::new(Grid::from_rows(rows).unwrap(), ids));
        }
        catalog
    }

    #[test]
    fn groups_rooms_by_door() {
        let mut ids = IdAllocator::new();
        let doors = catalog("doors", &[&["="], &["+"]], &mut ids);
        let rooms = catalog(
            "rooms",
            &[
                &["#=#", "# #", "###"],
                &["###", "+ =", "###"],
                &["###", "# #", "###"],
            ],
            &mut ids,
        );
        let index = DoorIndex::build(&rooms, &doors);

        let eq = doors.get(0).unwrap().id();
        let plus = doors.get(1).unwrap().id();
        let eq_rooms: Vec<usize> = index.rooms_for(eq).iter().map(|r| r.room).collect();
        assert_eq!(eq_rooms, vec![0, 1]);
        let plus_rooms: Vec<usize> = index.rooms_for(plus).iter().map(|r| r.room).collect();
        assert_eq!(plus_rooms, vec![1]);

        assert_eq!(index.rooms_for(eq)[0].positions, vec![Position::new(1, 0)]);
        assert_eq!(
            index.sockets_in(1),
            &[(eq, Position::new(2, 1)), (plus, Position::new(0, 1))]
        );
        assert!(index.sockets_in(2).is_empty());
        assert_eq!(index.max_sockets_per_room(), 2);
    }

    #[test]
    fn unknown_door_has_no_rooms() {
        let index = DoorIndex::default();
        assert!(index.rooms_for(TemplateId(42)).is_empty());
        assert!(index.sockets_in(0).is_empty());
    }
}
