//! The level being generated

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::pattern::{self, MirrorOps};
use crate::{Grid, Position, Template, WILDCARD};

/// A map under construction.
///
/// Starts entirely unresolved ([`WILDCARD`]). The generator stamps rooms onto
/// it, then records where the entrance and exit ended up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Map {
    grid: Grid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    entrance: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exit: Option<Position>,
}

impl Map {
    /// Create an unresolved map of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            grid: Grid::new(width, height),
            entrance: None,
            exit: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.grid.width()
    }

    pub fn height(&self) -> u32 {
        self.grid.height()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.grid.contains(x, y)
    }

    pub fn get(&self, x: i32, y: i32) -> Option<char> {
        self.grid.get(x, y)
    }

    pub fn set(&mut self, x: i32, y: i32, symbol: char) -> bool {
        self.grid.set(x, y, symbol)
    }

    /// Overwrite every cell with `symbol`.
    pub fn fill(&mut self, symbol: char) {
        self.grid.fill(symbol);
    }

    /// Reset the map to fully unresolved and forget the entrance and exit.
    pub fn clear(&mut self) {
        self.grid.fill(WILDCARD);
        self.entrance = None;
        self.exit = None;
    }

    /// Stamp a template's non-wildcard cells at `(x, y)`.
    pub fn place(&mut self, template: &Template, x: i32, y: i32) {
        pattern::place(&mut self.grid, template.content(), x, y);
    }

    /// Exact match of a template at `(x, y)`.
    pub fn matches(&self, template: &Template, x: i32, y: i32) -> bool {
        pattern::matches_exact(&self.grid, template.content(), x, y)
    }

    /// Every position where the template (or one of its variants) matches.
    pub fn find_matches(&self, template: &Template, ops: MirrorOps) -> Vec<Position> {
        pattern::find_matches(&self.grid, template.content(), ops)
    }

    /// Probabilistic pattern rewrite, see [`pattern::replace_pattern`].
    pub fn replace(
        &mut self,
        to_find: &Template,
        to_replace: &Template,
        chance: u8,
        ops: MirrorOps,
        rng: &mut impl Rng,
    ) -> bool {
        pattern::replace_pattern(
            &mut self.grid,
            to_find.content(),
            to_replace.content(),
            chance,
            ops,
            rng,
        )
    }

    /// Replace every `from` symbol with `to`.
    pub fn replace_symbol(&mut self, from: char, to: char) -> bool {
        pattern::replace_symbol(&mut self.grid, from, to)
    }

    pub fn entrance(&self) -> Option<Position> {
        self.entrance
    }

    pub fn exit(&self) -> Option<Position> {
        self.exit
    }

    pub fn set_entrance(&mut self, position: Position) {
        self.entrance = Some(position);
    }

    pub fn set_exit(&mut self, position: Position) {
        self.exit = Some(position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IdAllocator;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_new_map_is_unresolved() {
        let map = Map::new(10, 8);
        assert_eq!(map.width(), 10);
        assert_eq!(map.height(), 8);
        assert_eq!(map.grid().count(WILDCARD), 80);
        assert!(map.entrance().is_none());
        assert!(map.exit().is_none());
    }

    #[test]
    fn test_place_and_match_template() {
        let mut ids = IdAllocator::new();
        let room = Template::new(Grid::from_rows(&["###", "#?#"]).unwrap(), &mut ids);
        let mut map = Map::new(5, 5);
        map.place(&room, 1, 1);
        assert_eq!(map.get(1, 1), Some('#'));
        assert_eq!(map.get(2, 2), Some(WILDCARD));
        assert!(map.matches(&room, 1, 1));
        assert!(!map.matches(&room, 0, 0));
        assert_eq!(map.find_matches(&room, MirrorOps::NONE), vec![Position::new(1, 1)]);
    }

    #[test]
    fn test_replace_delegates() {
        let mut ids = IdAllocator::new();
        let find = Template::new(Grid::from_rows(&["?"]).unwrap(), &mut ids);
        let wall = Template::new(Grid::from_rows(&["#"]).unwrap(), &mut ids);
        let mut map = Map::new(3, 3);
        let mut rng = SmallRng::seed_from_u64(0);
        assert!(map.replace(&find, &wall, 100, MirrorOps::NONE, &mut rng));
        assert_eq!(map.grid().count('#'), 9);
        assert!(!map.replace_symbol('?', '#'));
    }

    #[test]
    fn test_serialize_entrance_and_exit() {
        let mut map = Map::new(2, 1);
        map.set_entrance(Position::new(0, 0));
        map.set_exit(Position::new(1, 0));
        let json = serde_json::to_string(&map).unwrap();
        let parsed: Map = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.entrance(), Some(Position::new(0, 0)));
        assert_eq!(parsed.exit(), Some(Position::new(1, 0)));

        map.clear();
        assert!(map.entrance().is_none());
    }
}
