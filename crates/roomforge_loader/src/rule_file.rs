//! Replacement rule files (`.rm2`).
//!
//! ```text
//! 1          format number
//! 10         priority
//! 3          width
//! 2          height
//! XY         mirror flags, applied to both patterns
//! #=#        `height` rows of the find pattern
//! ###
//! 100        chance in percent
//! ###        `height` rows of the replacement
//! ###
//! ```

use std::path::Path;

use roomforge_core::{pattern, Grid, IdAllocator, MirrorOps, Template};
use roomforge_rules::{ReplacementRule, RuleSet};
use tracing::{debug, info, warn};

use crate::reader::LineReader;
use crate::{read_dir_sorted, LoadError, ParseError};

/// File extension of rule files.
pub const RULE_EXTENSION: &str = "rm2";

const RULE_FORMAT: i64 = 1;

/// The contents of one rule file, before variants are expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSource {
    pub priority: i32,
    pub ops: MirrorOps,
    pub find: Grid,
    pub chance: i64,
    pub replace: Grid,
}

impl RuleSource {
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut reader = LineReader::new(text);
        reader.expect_format(RULE_FORMAT)?;
        let priority_line = reader.line() + 1;
        let priority = reader.next_int("priority")?;
        let priority = i32::try_from(priority).map_err(|_| ParseError::InvalidNumber {
            line: priority_line,
            what: "priority",
            found: priority.to_string(),
        })?;
        let width = reader.next_size("width")?;
        let height = reader.next_size("height")?;
        let ops = reader.next_flags()?;
        let find = reader.next_grid(width, height)?;
        let chance = reader.next_int("chance")?;
        let replace = reader.next_grid(width, height)?;
        Ok(Self {
            priority,
            ops,
            find,
            chance,
            replace,
        })
    }

    /// One rule per variant, pairing the n-th find variant with the n-th replacement.
    ///
    /// Variants the rule type refuses (for example an out-of-range chance)
    /// are dropped with a warning.
    pub fn expand(&self, ids: &mut IdAllocator) -> Vec<ReplacementRule> {
        let finds = pattern::create_mirrors(&self.find, self.ops);
        let replaces = pattern::create_mirrors(&self.replace, self.ops);
        let mut rules = Vec::with_capacity(finds.len());
        for (find, replace) in finds.into_iter().zip(replaces) {
            let initial = Template::new(find, ids);
            let replacement = Template::new(replace, ids);
            match ReplacementRule::new(initial, replacement, self.priority, self.chance) {
                Ok(rule) => rules.push(rule),
                Err(e) => warn!("dropping rule variant: {}", e),
            }
        }
        rules
    }
}

/// Load one rule file into `rules`. Returns the number of rules added.
pub fn load_rule_file(
    path: impl AsRef<Path>,
    rules: &mut RuleSet,
    ids: &mut IdAllocator,
) -> Result<usize, LoadError> {
    let path = path.as_ref();
    debug!("reading rule file {}", path.display());
    let text = std::fs::read_to_string(path)?;
    let source = RuleSource::parse(&text).map_err(|e| LoadError::parse(path, e))?;
    let expanded = source.expand(ids);
    let count = expanded.len();
    for rule in expanded {
        rules.push(rule);
    }
    Ok(count)
}

/// Load every `.rm2` file in `dir`, in file-name order, into a new rule set.
///
/// Files that fail to load are logged and skipped.
pub fn load_rule_dir(
    dir: impl AsRef<Path>,
    name: &str,
    ids: &mut IdAllocator,
) -> Result<RuleSet, LoadError> {
    let dir = dir.as_ref();
    info!("reading replacement rules in {} into '{}'", dir.display(), name);
    let mut rules = RuleSet::new(name);
    for path in read_dir_sorted(dir, RULE_EXTENSION)? {
        if let Err(e) = load_rule_file(&path, &mut rules, ids) {
            warn!("skipping rule file {}: {}", path.display(), e);
        }
    }
    info!("'{}' holds {} rules", name, rules.len());
    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEAD_END: &str = "1\n10\n3\n2\nY\n#=#\n###\n100\n###\n###\n";

    #[test]
    fn parse_rule_file() {
        let source = RuleSource::parse(DEAD_END).unwrap();
        assert_eq!(source.priority, 10);
        assert_eq!(source.chance, 100);
        assert_eq!(source.find.to_string(), "#=#\n###");
        assert_eq!(source.replace.to_string(), "###\n###");
    }

    #[test]
    fn mirrors_are_paired() {
        let mut ids = IdAllocator::new();
        let rules = RuleSource::parse(DEAD_END).unwrap().expand(&mut ids);

        assert_eq!(rules.len(), 2);
        assert_eq!(rules[1].initial().content().to_string(), "###\n#=#");
        assert!(rules.iter().all(|r| r.priority() == 10 && r.is_deterministic()));
    }

    #[test]
    fn out_of_range_chance_drops_every_variant() {
        let mut ids = IdAllocator::new();
        let text = "1\n1\n1\n1\nXY\na\n250\nb\n";
        let rules = RuleSource::parse(text).unwrap().expand(&mut ids);
        assert!(rules.is_empty());
    }

    #[test]
    fn missing_replacement_rows() {
        let err = RuleSource::parse("1\n1\n2\n1\n\nab\n50\n").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof { line: 8, .. }));
    }

    #[test]
    fn load_directory_in_name_order() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("02_moss.rm2"), "1\n5\n1\n1\n\n \n30\n~\n").unwrap();
        std::fs::write(tmp.path().join("01_walls.rm2"), DEAD_END).unwrap();
        std::fs::write(tmp.path().join("03_room.rm2"), "0\n1\n1\n\n#\n").unwrap();

        let mut ids = IdAllocator::new();
        let rules = load_rule_dir(tmp.path(), "modifications", &mut ids).unwrap();

        assert_eq!(rules.len(), 3);
        assert_eq!(rules.rules[0].priority(), 10);
        assert_eq!(rules.rules[2].priority(), 5);
        assert_eq!(rules.decoration_rules().len(), 1);
    }
}
