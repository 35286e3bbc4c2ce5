//! Pattern matching on symbol grids.
//!
//! Everything here is a free function over [`Grid`]s: geometric variants
//! ([`create_mirrors`]), the two match flavours ([`matches_exact`] and
//! [`matches_strict`]), stamping ([`place`]) and rewriting ([`replace_pattern`],
//! [`replace_symbol`]).

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{Grid, Position, WILDCARD};

// ─── Geometric variants ──────────────────────────────────────────────────────

/// Which geometric variants to derive from a pattern.
///
/// Parsed from a string of flag letters: `X` (horizontal mirror), `Y`
/// (vertical mirror) and `R` (90° rotation). Other characters are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MirrorOps {
    pub x: bool,
    pub y: bool,
    pub rotate: bool,
}

impl MirrorOps {
    /// Only the original pattern.
    pub const NONE: Self = Self {
        x: false,
        y: false,
        rotate: false,
    };

    /// All eight variants.
    pub const ALL: Self = Self {
        x: true,
        y: true,
        rotate: true,
    };

    pub fn parse(flags: &str) -> Self {
        Self {
            x: flags.contains('X'),
            y: flags.contains('Y'),
            rotate: flags.contains('R'),
        }
    }

    /// Number of variants [`create_mirrors`] produces for these flags.
    pub fn variant_count(self) -> usize {
        let per_orientation = match (self.x, self.y) {
            (true, true) => 4,
            (true, false) | (false, true) => 2,
            (false, false) => 1,
        };
        if self.rotate {
            per_orientation * 2
        } else {
            per_orientation
        }
    }
}

impl fmt::Display for MirrorOps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.x {
            f.write_str("X")?;
        }
        if self.y {
            f.write_str("Y")?;
        }
        if self.rotate {
            f.write_str("R")?;
        }
        Ok(())
    }
}

/// Horizontal mirror: columns are reversed.
pub fn mirror_x(pattern: &Grid) -> Grid {
    let (w, h) = (pattern.width(), pattern.height());
    let mut out = Grid::new(w, h);
    for y in 0..h {
        for x in 0..w {
            *out.at_mut(w - x - 1, y) = pattern.at(x, y);
        }
    }
    out
}

/// Vertical mirror: rows are reversed.
pub fn mirror_y(pattern: &Grid) -> Grid {
    let (w, h) = (pattern.width(), pattern.height());
    let mut out = Grid::new(w, h);
    for y in 0..h {
        for x in 0..w {
            *out.at_mut(x, h - y - 1) = pattern.at(x, y);
        }
    }
    out
}

/// Mirror on both axes (a half turn).
pub fn mirror_xy(pattern: &Grid) -> Grid {
    mirror_y(&mirror_x(pattern))
}

/// Rotate a quarter turn clockwise. Width and height are swapped.
pub fn rotate(pattern: &Grid) -> Grid {
    let (w, h) = (pattern.width(), pattern.height());
    let mut out = Grid::new(h, w);
    for y in 0..h {
        for x in 0..w {
            *out.at_mut(h - y - 1, x) = pattern.at(x, y);
        }
    }
    out
}

/// Build the geometric variants of `pattern`, original first.
///
/// The order is fixed so that two calls with the same flags pair up index by
/// index: original, X, Y, XY, then (with `R`) the rotation followed by its
/// mirrors. After rotating, the axes swap roles, so `Y` adds the rotation's
/// horizontal mirror and `X` its vertical mirror.
pub fn create_mirrors(pattern: &Grid, ops: MirrorOps) -> Vec<Grid> {
    let mut variants = Vec::with_capacity(ops.variant_count());
    variants.push(pattern.clone());
    if ops.x {
        variants.push(mirror_x(pattern));
    }
    if ops.y {
        variants.push(mirror_y(pattern));
    }
    if ops.x && ops.y {
        variants.push(mirror_xy(pattern));
    }

    if ops.rotate {
        let rotated = rotate(pattern);
        let mut turned = Vec::with_capacity(3);
        if ops.y {
            turned.push(mirror_x(&rotated));
        }
        if ops.x {
            turned.push(mirror_y(&rotated));
        }
        if ops.x && ops.y {
            turned.push(mirror_xy(&rotated));
        }
        variants.push(rotated);
        variants.extend(turned);
    }
    variants
}

// ─── Matching ────────────────────────────────────────────────────────────────

/// Whether a `w`×`h` pattern at `(xpos, ypos)` lies entirely inside `grid`.
fn fits(grid: &Grid, pattern: &Grid, xpos: i32, ypos: i32) -> bool {
    xpos >= 0
        && ypos >= 0
        && xpos as i64 + pattern.width() as i64 <= grid.width() as i64
        && ypos as i64 + pattern.height() as i64 <= grid.height() as i64
}

/// Exact match: every pattern cell is the wildcard or equals the grid cell.
///
/// A wildcard on the grid side is an ordinary symbol here.
pub fn matches_exact(grid: &Grid, pattern: &Grid, xpos: i32, ypos: i32) -> bool {
    if !fits(grid, pattern, xpos, ypos) {
        return false;
    }
    let (ox, oy) = (xpos as u32, ypos as u32);
    for y in 0..pattern.height() {
        for x in 0..pattern.width() {
            let want = pattern.at(x, y);
            if want != WILDCARD && want != grid.at(ox + x, oy + y) {
                return false;
            }
        }
    }
    true
}

/// Strict match: a wildcard on either side matches anything.
pub fn matches_strict(grid: &Grid, pattern: &Grid, xpos: i32, ypos: i32) -> bool {
    if !fits(grid, pattern, xpos, ypos) {
        return false;
    }
    let (ox, oy) = (xpos as u32, ypos as u32);
    for y in 0..pattern.height() {
        for x in 0..pattern.width() {
            let want = pattern.at(x, y);
            let have = grid.at(ox + x, oy + y);
            if want != WILDCARD && have != WILDCARD && want != have {
                return false;
            }
        }
    }
    true
}

/// Every top-left offset at which `pattern` exact-matches `grid`.
///
/// With flags, each variant is scanned in [`create_mirrors`] order and the
/// positions are concatenated. The same position can appear more than once.
pub fn find_matches(grid: &Grid, pattern: &Grid, ops: MirrorOps) -> Vec<Position> {
    let mut positions = Vec::new();
    for variant in create_mirrors(pattern, ops) {
        if variant.width() > grid.width() || variant.height() > grid.height() {
            continue;
        }
        for y in 0..=(grid.height() - variant.height()) as i32 {
            for x in 0..=(grid.width() - variant.width()) as i32 {
                if matches_exact(grid, &variant, x, y) {
                    positions.push(Position::new(x, y));
                }
            }
        }
    }
    positions
}

// ─── Writing ─────────────────────────────────────────────────────────────────

/// Stamp `src` onto `dest` at `(xpos, ypos)`.
///
/// Wildcard cells of `src` are skipped. Cells falling outside `dest` are
/// clipped silently.
pub fn place(dest: &mut Grid, src: &Grid, xpos: i32, ypos: i32) {
    for y in 0..src.height() {
        for x in 0..src.width() {
            let symbol = src.at(x, y);
            if symbol != WILDCARD {
                dest.set(xpos + x as i32, ypos + y as i32, symbol);
            }
        }
    }
}

/// Replace occurrences of `to_find` with `to_replace`, each with `chance`
/// percent probability.
///
/// Both templates go through [`create_mirrors`] with the same flags and
/// variant `i` of one is replaced by variant `i` of the other. Every match
/// draws one value in `0..100` from `rng`; the replacement happens when the
/// draw is below `chance`. Matching runs against the grid as it is being
/// rewritten, so an earlier replacement can create or destroy later matches.
///
/// Returns `true` if at least one replacement was made.
pub fn replace_pattern(
    grid: &mut Grid,
    to_find: &Grid,
    to_replace: &Grid,
    chance: u8,
    ops: MirrorOps,
    rng: &mut impl Rng,
) -> bool {
    let finds = create_mirrors(to_find, ops);
    let replacements = create_mirrors(to_replace, ops);
    let mut replaced = false;

    for (find, replacement) in finds.iter().zip(replacements.iter()) {
        if find.width() > grid.width() || find.height() > grid.height() {
            continue;
        }
        for y in 0..=(grid.height() - find.height()) as i32 {
            for x in 0..=(grid.width() - find.width()) as i32 {
                if !matches_exact(grid, find, x, y) {
                    continue;
                }
                if rng.gen_range(0..100u8) < chance {
                    place(grid, replacement, x, y);
                    replaced = true;
                }
            }
        }
    }
    replaced
}

/// Replace every `from` symbol with `to`. Returns `true` if any cell changed.
pub fn replace_symbol(grid: &mut Grid, from: char, to: char) -> bool {
    if from == to {
        return false;
    }
    let mut modified = false;
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let cell = grid.at_mut(x, y);
            if *cell == from {
                *cell = to;
                modified = true;
            }
        }
    }
    modified
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn grid(rows: &[&str]) -> Grid {
        Grid::from_rows(rows).unwrap()
    }

    fn seeded_rng() -> SmallRng {
        SmallRng::seed_from_u64(0)
    }

    #[test]
    fn parse_mirror_ops() {
        assert_eq!(MirrorOps::parse(""), MirrorOps::NONE);
        assert_eq!(MirrorOps::parse("XYR"), MirrorOps::ALL);
        let only_r = MirrorOps::parse("R");
        assert!(only_r.rotate && !only_r.x && !only_r.y);
        assert_eq!(MirrorOps::parse("RY").to_string(), "YR");
    }

    #[test]
    fn mirror_x_reverses_columns() {
        assert_eq!(mirror_x(&grid(&["ab", "cd"])), grid(&["ba", "dc"]));
    }

    #[test]
    fn mirror_y_reverses_rows() {
        assert_eq!(mirror_y(&grid(&["ab", "cd"])), grid(&["cd", "ab"]));
    }

    #[test]
    fn rotate_is_clockwise_quarter_turn() {
        let p = grid(&["abc", "def"]);
        assert_eq!(rotate(&p), grid(&["da", "eb", "fc"]));
    }

    #[test]
    fn rotate_four_times_is_identity() {
        let p = grid(&["ab?", "cd=", "#  "]);
        let back = rotate(&rotate(&rotate(&rotate(&p))));
        assert_eq!(back, p);
    }

    #[test]
    fn full_mirror_twice_is_identity() {
        let p = grid(&["abc", "de?"]);
        assert_eq!(mirror_xy(&mirror_xy(&p)), p);
    }

    #[test]
    fn create_mirrors_all_flags_order() {
        let p = grid(&["ab", "cd", "ef"]);
        let variants = create_mirrors(&p, MirrorOps::ALL);
        assert_eq!(variants.len(), 8);
        let r = rotate(&p);
        assert_eq!(variants[0], p);
        assert_eq!(variants[1], mirror_x(&p));
        assert_eq!(variants[2], mirror_y(&p));
        assert_eq!(variants[3], mirror_xy(&p));
        assert_eq!(variants[4], r);
        assert_eq!(variants[5], mirror_x(&r));
        assert_eq!(variants[6], mirror_y(&r));
        assert_eq!(variants[7], mirror_xy(&r));
    }

    #[test]
    fn create_mirrors_partial_flags() {
        let p = grid(&["ab", "cd"]);
        assert_eq!(create_mirrors(&p, MirrorOps::NONE), vec![p.clone()]);

        let xr = create_mirrors(&p, MirrorOps::parse("XR"));
        assert_eq!(xr, vec![p.clone(), mirror_x(&p), rotate(&p), mirror_y(&rotate(&p))]);

        let yr = create_mirrors(&p, MirrorOps::parse("YR"));
        assert_eq!(yr, vec![p.clone(), mirror_y(&p), rotate(&p), mirror_x(&rotate(&p))]);
    }

    #[test]
    fn paired_mirrors_line_up() {
        let find = grid(&["#=", "##"]);
        let replace = grid(&["#-", "##"]);
        let finds = create_mirrors(&find, MirrorOps::ALL);
        let replaces = create_mirrors(&replace, MirrorOps::ALL);
        for (f, r) in finds.iter().zip(replaces.iter()) {
            // the single differing cell stays at the same coordinates in each pair
            let diffs: Vec<usize> = f
                .cells()
                .iter()
                .zip(r.cells())
                .enumerate()
                .filter(|(_, (a, b))| a != b)
                .map(|(i, _)| i)
                .collect();
            assert_eq!(diffs.len(), 1);
            assert_eq!(f.cells()[diffs[0]], '=');
        }
    }

    #[test]
    fn exact_match_treats_grid_wildcard_as_symbol() {
        let map = grid(&["??", "??"]);
        assert!(!matches_exact(&map, &grid(&["#"]), 0, 0));
        assert!(matches_exact(&map, &grid(&["?"]), 0, 0));
        assert!(matches_strict(&map, &grid(&["#"]), 0, 0));
    }

    #[test]
    fn strict_match_rejects_conflicts() {
        let map = grid(&["#?", "= "]);
        assert!(matches_strict(&map, &grid(&["#=", "=?"]), 0, 0));
        assert!(!matches_strict(&map, &grid(&["#=", "#?"]), 0, 0));
    }

    #[test]
    fn match_out_of_bounds_is_false() {
        let map = grid(&["##", "##"]);
        assert!(!matches_exact(&map, &grid(&["##"]), 1, 0));
        assert!(!matches_exact(&map, &grid(&["#"]), -1, 0));
        assert!(!matches_strict(&map, &grid(&["#", "#", "#"]), 0, 0));
    }

    #[test]
    fn exact_match_without_wildcards_is_equality() {
        let map = grid(&["abc", "def", "ghi"]);
        let pattern = grid(&["ef", "hi"]);
        for y in 0..2 {
            for x in 0..2 {
                let region: Vec<char> = (0..2)
                    .flat_map(|dy| (0..2).map(move |dx| (x + dx, y + dy)))
                    .map(|(cx, cy)| map.at(cx, cy))
                    .collect();
                assert_eq!(
                    matches_exact(&map, &pattern, x as i32, y as i32),
                    region == pattern.cells()
                );
            }
        }
    }

    #[test]
    fn place_scenario_two_by_two() {
        let mut map = Grid::new(5, 5);
        place(&mut map, &grid(&["AA", "AA"]), 1, 1);
        for y in 0..5 {
            for x in 0..5 {
                let expected = if (1..=2).contains(&x) && (1..=2).contains(&y) {
                    'A'
                } else {
                    WILDCARD
                };
                assert_eq!(map.at(x, y), expected, "cell ({x}, {y})");
            }
        }
    }

    #[test]
    fn place_skips_wildcards_and_clips() {
        let mut map = Grid::filled(3, 3, '.');
        place(&mut map, &grid(&["?B", "CD"]), 2, 2);
        assert_eq!(map.at(2, 2), '.');
        assert_eq!(map.count('.'), 9);

        place(&mut map, &grid(&["?B", "CD"]), -1, -1);
        assert_eq!(map.at(0, 0), 'D');
        assert_eq!(map.count('.'), 8);
    }

    #[test]
    fn find_matches_single_socket() {
        let room = grid(&["#####", "#   =", "#####"]);
        assert_eq!(
            find_matches(&room, &grid(&["="]), MirrorOps::NONE),
            vec![Position::new(4, 1)]
        );
    }

    #[test]
    fn find_matches_does_not_deduplicate_variants() {
        let map = grid(&["##", "##"]);
        let found = find_matches(&map, &grid(&["#"]), MirrorOps::parse("X"));
        assert_eq!(found.len(), 8);
    }

    #[test]
    fn find_matches_pattern_as_large_as_grid() {
        let map = grid(&["ab", "cd"]);
        assert_eq!(
            find_matches(&map, &map, MirrorOps::NONE),
            vec![Position::new(0, 0)]
        );
    }

    #[test]
    fn replace_pattern_full_chance_replaces_all() {
        let mut map = grid(&["#=#", "###", "#=#"]);
        let mut rng = seeded_rng();
        let changed = replace_pattern(
            &mut map,
            &grid(&["="]),
            &grid(&["#"]),
            100,
            MirrorOps::NONE,
            &mut rng,
        );
        assert!(changed);
        assert_eq!(map.count('#'), 9);
    }

    #[test]
    fn replace_pattern_zero_chance_never_replaces() {
        let mut map = grid(&["#=#"]);
        let before = map.clone();
        let mut rng = seeded_rng();
        let changed = replace_pattern(
            &mut map,
            &grid(&["="]),
            &grid(&["#"]),
            0,
            MirrorOps::NONE,
            &mut rng,
        );
        assert!(!changed);
        assert_eq!(map, before);
    }

    #[test]
    fn replace_pattern_uses_paired_variants() {
        let find = grid(&["=  "]);
        let replace = grid(&["#  "]);
        let mut map = grid(&["  =", "   ", "=  "]);
        let mut rng = seeded_rng();
        assert!(replace_pattern(&mut map, &find, &replace, 100, MirrorOps::parse("X"), &mut rng));
        assert_eq!(map, grid(&["  #", "   ", "#  "]));
    }

    #[test]
    fn replace_pattern_is_reproducible() {
        let source = grid(&["..........", "..........", ".........."]);
        let run = |seed| {
            let mut map = source.clone();
            let mut rng = SmallRng::seed_from_u64(seed);
            replace_pattern(&mut map, &grid(&["."]), &grid(&["*"]), 50, MirrorOps::NONE, &mut rng);
            map
        };
        assert_eq!(run(7), run(7));
    }

    #[test]
    fn replace_pattern_on_whole_grid() {
        let mut map = grid(&["ab", "cd"]);
        let mut rng = seeded_rng();
        assert!(replace_pattern(
            &mut map,
            &grid(&["ab", "cd"]),
            &grid(&["xy", "zw"]),
            100,
            MirrorOps::NONE,
            &mut rng,
        ));
        assert_eq!(map, grid(&["xy", "zw"]));
    }

    #[test]
    fn replace_symbol_same_symbol_is_noop() {
        let mut map = grid(&["#?", "?="]);
        let before = map.clone();
        for s in ['#', '?', '=', 'z'] {
            assert!(!replace_symbol(&mut map, s, s));
        }
        assert_eq!(map, before);
    }

    #[test]
    fn replace_symbol_reports_changes() {
        let mut map = grid(&["#?", "?="]);
        assert!(replace_symbol(&mut map, '?', '#'));
        assert_eq!(map.count('#'), 3);
        assert!(!replace_symbol(&mut map, '?', '#'));
    }
}
