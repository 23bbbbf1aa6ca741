//! `.gcloudignore` support.
//!
//! - [`loader`] reads the ignore file (and `#!include:` targets) into an
//!   [`IgnoreRuleSet`]
//! - [`pattern`] rewrites git-only glob syntax for the gitignore compiler
//! - [`matcher`] evaluates a rule set against archive-relative paths

pub mod loader;
pub mod matcher;
pub mod pattern;

pub use loader::INCLUDE_DIRECTIVE;
pub use loader::IgnoreRuleSet;
pub use loader::load_ignore_rules;
pub use loader::load_ignore_rules_with;
pub use matcher::IgnoreMatcher;
pub use matcher::matches;
pub use pattern::to_glob_syntax;
