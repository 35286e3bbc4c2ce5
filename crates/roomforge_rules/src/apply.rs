//! The rule engine: applies a [`RuleSet`] to a [`Map`].
//!
//! The entry points are [`apply_cleanup`] and [`apply_decoration`]. Both take
//! a caller-supplied random number generator so a run can be replayed.

use rand::Rng;
use roomforge_core::{Map, MirrorOps};
use tracing::{debug, info, warn};

use crate::{ReplacementRule, RuleSet, CLEANUP_MAX_PASSES};

// ─── Single rule ─────────────────────────────────────────────────────────────

/// Apply one rule over the whole map. Returns `true` if any match was replaced.
///
/// Mirrors were already expanded into separate rules when the rule set was
/// built, so the rule is matched as-is.
pub fn apply_rule(map: &mut Map, rule: &ReplacementRule, rng: &mut impl Rng) -> bool {
    map.replace(
        rule.initial(),
        rule.replacement(),
        rule.chance(),
        MirrorOps::NONE,
        rng,
    )
}

// ─── Cleanup ─────────────────────────────────────────────────────────────────

/// Run every deterministic rule, in priority order, until a full pass changes nothing.
///
/// `after_pass` is called with the map after every pass. Returns the number of
/// passes run, including the final pass that changed nothing.
pub fn apply_cleanup(
    map: &mut Map,
    rules: &RuleSet,
    rng: &mut impl Rng,
    mut after_pass: impl FnMut(&Map),
) -> u32 {
    let cleanup = rules.cleanup_rules();
    info!("cleanup: {} rules", cleanup.len());
    if cleanup.is_empty() {
        return 0;
    }

    for pass in 1..=CLEANUP_MAX_PASSES {
        let mut modified = false;
        for rule in &cleanup {
            // every rule runs, even once the pass is known to be dirty
            modified |= apply_rule(map, rule, rng);
        }
        after_pass(map);
        debug!(pass, modified, "cleanup pass");
        if !modified {
            return pass;
        }
    }
    warn!(
        "rule set '{}' did not converge after {} cleanup passes",
        rules.name, CLEANUP_MAX_PASSES
    );
    CLEANUP_MAX_PASSES
}

// ─── Decoration ──────────────────────────────────────────────────────────────

/// Run every probabilistic rule once, in priority order.
///
/// Each match rolls its own chance. `after_rule` is called with the map after
/// every rule. Returns how many rules replaced at least one match.
pub fn apply_decoration(
    map: &mut Map,
    rules: &RuleSet,
    rng: &mut impl Rng,
    mut after_rule: impl FnMut(&Map),
) -> usize {
    let decoration = rules.decoration_rules();
    info!("decoration: {} rules", decoration.len());

    let mut fired = 0;
    for rule in decoration {
        debug!(
            "replacing {} by {} with {}% chance",
            rule.initial().id(),
            rule.replacement().id(),
            rule.chance()
        );
        if apply_rule(map, rule, rng) {
            fired += 1;
        }
        after_rule(map);
    }
    fired
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use roomforge_core::{Grid, IdAllocator, Template};

    fn seeded_rng() -> SmallRng {
        SmallRng::seed_from_u64(0)
    }

    fn map_from(rows: &[&str]) -> Map {
        let grid = Grid::from_rows(rows).unwrap();
        let mut map = Map::new(grid.width(), grid.height());
        *map.grid_mut() = grid;
        map
    }

    fn rule(
        find: &[&str],
        replace: &[&str],
        priority: i32,
        chance: i64,
        ids: &mut IdAllocator,
    ) -> ReplacementRule {
        ReplacementRule::new(
            Template::new(Grid::from_rows(find).unwrap(), ids),
            Template::new(Grid::from_rows(replace).unwrap(), ids),
            priority,
            chance,
        )
        .unwrap()
    }

    #[test]
    fn cleanup_reaches_fixed_point_through_chained_rules() {
        let mut ids = IdAllocator::new();
        let mut rules = RuleSet::new("cleanup");
        // b -> c runs first but only sees b once a -> b has fired
        rules.push(rule(&["b"], &["c"], 1, 100, &mut ids));
        rules.push(rule(&["a"], &["b"], 2, 100, &mut ids));

        let mut map = map_from(&["aab", "#a#"]);
        let mut rng = seeded_rng();
        let passes = apply_cleanup(&mut map, &rules, &mut rng, |_| {});

        assert_eq!(map.grid().to_string(), "ccc\n#c#");
        assert_eq!(passes, 3);
    }

    #[test]
    fn cleanup_again_after_fixed_point_is_noop() {
        let mut ids = IdAllocator::new();
        let mut rules = RuleSet::new("cleanup");
        rules.push(rule(&["#=#", "# #"], &["###", "# #"], 1, 100, &mut ids));

        let mut map = map_from(&["#=#", "# #", "#=#"]);
        let mut rng = seeded_rng();
        apply_cleanup(&mut map, &rules, &mut rng, |_| {});
        let settled = map.grid().clone();

        let passes = apply_cleanup(&mut map, &rules, &mut rng, |_| {});
        assert_eq!(passes, 1);
        assert_eq!(map.grid(), &settled);
    }

    #[test]
    fn cleanup_ignores_probabilistic_rules() {
        let mut ids = IdAllocator::new();
        let mut rules = RuleSet::new("mixed");
        rules.push(rule(&["a"], &["z"], 1, 99, &mut ids));

        let mut map = map_from(&["aaa"]);
        let mut rng = seeded_rng();
        assert_eq!(apply_cleanup(&mut map, &rules, &mut rng, |_| {}), 0);
        assert_eq!(map.grid().to_string(), "aaa");
    }

    #[test]
    fn cleanup_cycle_stops_at_cap() {
        let mut ids = IdAllocator::new();
        let mut rules = RuleSet::new("cycle");
        rules.push(rule(&["a"], &["b"], 1, 100, &mut ids));
        rules.push(rule(&["b"], &["a"], 2, 100, &mut ids));

        let mut map = map_from(&["a"]);
        let mut rng = seeded_rng();
        let mut seen = 0;
        let passes = apply_cleanup(&mut map, &rules, &mut rng, |_| seen += 1);
        assert_eq!(passes, CLEANUP_MAX_PASSES);
        assert_eq!(seen, CLEANUP_MAX_PASSES);
    }

    #[test]
    fn decoration_runs_each_rule_once() {
        let mut ids = IdAllocator::new();
        let mut rules = RuleSet::new("decoration");
        // x -> y -> x would cycle under cleanup; decoration only goes once each
        rules.push(rule(&["x"], &["y"], 1, 99, &mut ids));
        rules.push(rule(&["y"], &["x"], 2, 0, &mut ids));

        let mut map = map_from(&["xxxxxxxxxx"]);
        let mut rng = seeded_rng();
        let mut calls = 0;
        let fired = apply_decoration(&mut map, &rules, &mut rng, |_| calls += 1);

        assert_eq!(calls, 2);
        assert!(fired <= 1);
        assert_eq!(map.grid().count('x') + map.grid().count('y'), 10);
    }

    #[test]
    fn decoration_is_reproducible_with_same_seed() {
        let mut ids = IdAllocator::new();
        let mut rules = RuleSet::new("decoration");
        rules.push(rule(&[" "], &["~"], 1, 40, &mut ids));

        let run = || {
            let mut map = map_from(&["          ", "          ", "          "]);
            let mut rng = SmallRng::seed_from_u64(42);
            apply_decoration(&mut map, &rules, &mut rng, |_| {});
            map.grid().clone()
        };
        assert_eq!(run(), run());
    }
}
