//! Rewrite rules for finished roomforge maps.
//!
//! A [`ReplacementRule`] pairs a find template with a same-sized replacement.
//! Rules with a 100% chance are cleanup rules: [`apply_cleanup`] runs them
//! until the map stops changing. Rules below 100% are decoration rules:
//! [`apply_decoration`] runs each of them once, rolling per match.
//!
//! This crate has no engine dependency. It operates on plain data from `roomforge_core`.

mod apply;
mod types;

pub use apply::{apply_cleanup, apply_decoration, apply_rule};
pub use types::{ReplacementRule, RuleError, RuleSet, ALWAYS};

/// Maximum number of full cleanup passes before [`apply_cleanup`] gives up.
///
/// Deterministic rules that undo each other (`a -> b`, `b -> a`) never reach a
/// fixed point. Hitting the cap is logged as a warning and the map is left as
/// the last pass produced it.
pub const CLEANUP_MAX_PASSES: u32 = 1000;
