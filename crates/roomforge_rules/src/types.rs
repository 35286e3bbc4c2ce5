//! Data types for the rewrite rules.

use roomforge_core::Template;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Chance value of a deterministic (cleanup) rule.
pub const ALWAYS: u8 = 100;

/// Reasons a rule is refused at construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("find pattern is {find_w}x{find_h} but replacement is {repl_w}x{repl_h}")]
    SizeMismatch {
        find_w: u32,
        find_h: u32,
        repl_w: u32,
        repl_h: u32,
    },
    #[error("chance {0} is outside 0..=100")]
    InvalidChance(i64),
}

// ─── ReplacementRule ─────────────────────────────────────────────────────────

/// A find/replace pair.
///
/// Both templates always have identical dimensions; [`ReplacementRule::new`]
/// refuses anything else, so the rule engine never sees a malformed rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplacementRule {
    initial: Template,
    replacement: Template,
    /// Lower priorities are applied first.
    priority: i32,
    /// Per-match replacement probability in percent. `100` marks a cleanup rule.
    chance: u8,
}

impl ReplacementRule {
    pub fn new(
        initial: Template,
        replacement: Template,
        priority: i32,
        chance: i64,
    ) -> Result<Self, RuleError> {
        if initial.x_size() != replacement.x_size() || initial.y_size() != replacement.y_size() {
            return Err(RuleError::SizeMismatch {
                find_w: initial.x_size(),
                find_h: initial.y_size(),
                repl_w: replacement.x_size(),
                repl_h: replacement.y_size(),
            });
        }
        let chance = u8::try_from(chance)
            .ok()
            .filter(|c| *c <= ALWAYS)
            .ok_or(RuleError::InvalidChance(chance))?;
        Ok(Self {
            initial,
            replacement,
            priority,
            chance,
        })
    }

    pub fn initial(&self) -> &Template {
        &self.initial
    }

    pub fn replacement(&self) -> &Template {
        &self.replacement
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn chance(&self) -> u8 {
        self.chance
    }

    /// Whether this rule always fires (cleanup) rather than rolling (decoration).
    pub fn is_deterministic(&self) -> bool {
        self.chance == ALWAYS
    }
}

// ─── RuleSet ─────────────────────────────────────────────────────────────────

/// A named, ordered collection of rules.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleSet {
    pub name: String,
    pub rules: Vec<ReplacementRule>,
}

impl RuleSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
        }
    }

    pub fn push(&mut self, rule: ReplacementRule) {
        self.rules.push(rule);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Deterministic rules, sorted by ascending priority (stable).
    pub fn cleanup_rules(&self) -> Vec<&ReplacementRule> {
        self.sorted_by_priority(|r| r.is_deterministic())
    }

    /// Probabilistic rules, sorted by ascending priority (stable).
    pub fn decoration_rules(&self) -> Vec<&ReplacementRule> {
        self.sorted_by_priority(|r| !r.is_deterministic())
    }

    fn sorted_by_priority(&self, keep: impl Fn(&ReplacementRule) -> bool) -> Vec<&ReplacementRule> {
        let mut rules: Vec<&ReplacementRule> = self.rules.iter().filter(|r| keep(r)).collect();
        rules.sort_by_key(|r| r.priority);
        rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomforge_core::{Grid, IdAllocator};

    fn template(rows: &[&str], ids: &mut IdAllocator) -> Template {
        Template::new(Grid::from_rows(rows).unwrap(), ids)
    }

    #[test]
    fn rule_rejects_size_mismatch() {
        let mut ids = IdAllocator::new();
        let err = ReplacementRule::new(
            template(&["=="], &mut ids),
            template(&["#"], &mut ids),
            1,
            100,
        )
        .unwrap_err();
        assert_eq!(
            err,
            RuleError::SizeMismatch {
                find_w: 2,
                find_h: 1,
                repl_w: 1,
                repl_h: 1
            }
        );
    }

    #[test]
    fn rule_rejects_chance_out_of_range() {
        let mut ids = IdAllocator::new();
        for chance in [-1, 101, 1000] {
            let err = ReplacementRule::new(
                template(&["="], &mut ids),
                template(&["#"], &mut ids),
                1,
                chance,
            )
            .unwrap_err();
            assert_eq!(err, RuleError::InvalidChance(chance));
        }
    }

    #[test]
    fn rule_set_splits_and_sorts() {
        let mut ids = IdAllocator::new();
        let mut set = RuleSet::new("modifications");
        for (priority, chance) in [(3, 100), (1, 30), (1, 100), (2, 100), (0, 50)] {
            set.push(
                ReplacementRule::new(
                    template(&["="], &mut ids),
                    template(&["#"], &mut ids),
                    priority,
                    chance,
                )
                .unwrap(),
            );
        }
        let cleanup: Vec<i32> = set.cleanup_rules().iter().map(|r| r.priority()).collect();
        assert_eq!(cleanup, vec![1, 2, 3]);
        let decoration: Vec<(i32, u8)> = set
            .decoration_rules()
            .iter()
            .map(|r| (r.priority(), r.chance()))
            .collect();
        assert_eq!(decoration, vec![(0, 50), (1, 30)]);
    }
}
