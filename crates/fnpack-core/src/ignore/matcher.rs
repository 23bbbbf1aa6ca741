//! Evaluation of a whole ignore rule set against candidate paths.

use crate::PackError;
use crate::Result;
use crate::ignore::loader::IgnoreRuleSet;
use crate::ignore::pattern::to_glob_syntax;
use ::ignore::Match;
use ::ignore::gitignore::Gitignore;
use ::ignore::gitignore::GitignoreBuilder;
use std::path::Component;
use std::path::Path;

/// Compiled, ordered ignore rules with gitignore evaluation semantics.
///
/// Rules are evaluated in order and the last matching rule decides, so a
/// later `!pattern` re-includes what an earlier rule excluded. A path below an
/// ignored directory is always ignored, whatever later rules say about the
/// path itself.
///
/// # Examples
///
/// ```
/// use fnpack_core::ignore::IgnoreMatcher;
///
/// let matcher = IgnoreMatcher::new(&["*.log", "!keep.log", "node_modules/"])?;
///
/// assert!(matcher.is_ignored("other.log", false));
/// assert!(!matcher.is_ignored("keep.log", false));
/// assert!(matcher.is_ignored("node_modules/dep/a.js", false));
/// assert!(!matcher.is_ignored("index.js", false));
/// # Ok::<(), fnpack_core::PackError>(())
/// ```
#[derive(Debug, Clone)]
pub struct IgnoreMatcher {
    rules: Gitignore,
    skipped: usize,
}

impl Default for IgnoreMatcher {
    fn default() -> Self {
        Self {
            rules: Gitignore::empty(),
            skipped: 0,
        }
    }
}

impl IgnoreMatcher {
    /// Compiles rule lines; blank lines and comments are dropped.
    ///
    /// A line git would never match (an unterminated `[` class, a dangling
    /// `\`) is skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`PackError::IgnoreRules`] if the accepted lines cannot be
    /// compiled into one matcher.
    pub fn new<S: AsRef<str>>(rules: &[S]) -> Result<Self> {
        // paths handed to the matcher are already relative to the source root
        let mut builder = GitignoreBuilder::new(".");
        let mut skipped = 0;
        for line in rules {
            let line = line.as_ref();
            if let Err(err) = builder.add_line(None, &to_glob_syntax(line)) {
                tracing::warn!(rule = line, error = %err, "skipping invalid ignore rule");
                skipped += 1;
            }
        }

        let rules = builder.build().map_err(PackError::IgnoreRules)?;
        Ok(Self { rules, skipped })
    }

    /// Compiles a loaded rule set.
    ///
    /// # Errors
    ///
    /// Same as [`IgnoreMatcher::new`].
    pub fn from_rules(rules: &IgnoreRuleSet) -> Result<Self> {
        Self::new(rules.as_slice())
    }

    /// Returns `true` when no effective pattern was compiled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Number of effective patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Number of lines dropped because they are not valid patterns.
    #[must_use]
    pub const fn skipped(&self) -> usize {
        self.skipped
    }

    /// Decision of the rules for `path` alone, ancestors not considered.
    ///
    /// Returns `Some(true)` if the last matching rule excludes the path,
    /// `Some(false)` if it re-includes it, and `None` if no rule matches.
    #[must_use]
    pub fn decision(&self, path: &str, is_dir: bool) -> Option<bool> {
        match self.rules.matched(normalize(path), is_dir) {
            Match::None => None,
            Match::Ignore(_) => Some(true),
            Match::Whitelist(_) => Some(false),
        }
    }

    /// Tests whether a `/`-separated path relative to the source root is
    /// ignored, including through any ignored ancestor directory.
    #[must_use]
    pub fn is_ignored(&self, path: &str, is_dir: bool) -> bool {
        if self.rules.is_empty() {
            return false;
        }
        let path = normalize(path);
        if path.is_empty() {
            return false;
        }

        // Outermost ancestor first: git never looks inside an excluded
        // directory, so a whitelisted descendant stays excluded.
        for (idx, _) in path.match_indices('/') {
            if self.rules.matched(&path[..idx], true).is_ignore() {
                return true;
            }
        }

        self.rules.matched(&path, is_dir).is_ignore()
    }

    /// Same as [`IgnoreMatcher::is_ignored`] for a relative filesystem path.
    ///
    /// A path that is not valid UTF-8 is never reported as ignored.
    #[must_use]
    pub fn is_path_ignored(&self, path: &Path, is_dir: bool) -> bool {
        to_slash_path(path).is_some_and(|path| self.is_ignored(&path, is_dir))
    }
}

/// Tests a single path against rule lines with gitignore semantics.
///
/// Convenience wrapper compiling `rules` on every call; reuse an
/// [`IgnoreMatcher`] when testing many paths. A rule set that fails to
/// compile ignores nothing.
///
/// # Examples
///
/// ```
/// use fnpack_core::ignore::matches;
///
/// assert!(matches(&["*.log"], "logs/debug.log", false));
/// assert!(!matches(&["*.log", "!keep.log"], "keep.log", false));
/// assert!(matches(&["[[:digit:]].txt"], "1.txt", false));
/// assert!(!matches::<&str>(&[], "anything", false));
/// ```
#[must_use]
pub fn matches<S: AsRef<str>>(rules: &[S], path: &str, is_dir: bool) -> bool {
    IgnoreMatcher::new(rules).is_ok_and(|matcher| matcher.is_ignored(path, is_dir))
}

/// Joins the normal components of a relative path with `/`.
///
/// Returns `None` if a component is not valid UTF-8.
#[must_use]
pub fn to_slash_path(path: &Path) -> Option<String> {
    let mut out = String::new();
    for component in path.components() {
        if let Component::Normal(part) = component {
            if !out.is_empty() {
                out.push('/');
            }
            out.push_str(part.to_str()?);
        }
    }
    Some(out)
}

fn normalize(path: &str) -> String {
    let unified = path.replace('\\', "/");
    let mut trimmed = unified.as_str();
    while let Some(rest) = trimmed.strip_prefix("./") {
        trimmed = rest;
    }
    trimmed.trim_matches('/').to_string()
}
