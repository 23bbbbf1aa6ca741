//! Loading of the ignore file from a source directory.

use crate::PackConfig;
use crate::PackError;
use crate::Result;
use std::io::ErrorKind;
use std::path::Path;

/// Directive splicing another file's rules into the ignore file.
pub const INCLUDE_DIRECTIVE: &str = "#!include:";

/// Ordered ignore rule lines, as read from the ignore file.
///
/// Lines are kept verbatim apart from trimming; comments and blank lines are
/// only discarded when the set is compiled into an
/// [`IgnoreMatcher`](crate::ignore::IgnoreMatcher).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreRuleSet {
    rules: Vec<String>,
}

impl IgnoreRuleSet {
    /// Creates an empty rule set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the set holds no line at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Number of lines in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// The rule lines, in file order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.rules
    }

    /// Iterates over the rule lines.
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.rules.iter()
    }
}

impl From<Vec<String>> for IgnoreRuleSet {
    fn from(rules: Vec<String>) -> Self {
        Self { rules }
    }
}

impl<S: Into<String>> FromIterator<S> for IgnoreRuleSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a IgnoreRuleSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

/// Loads `.gcloudignore` from the root of `dir`.
///
/// A missing file yields an empty set. `#!include:` directives are expanded.
///
/// # Examples
///
/// ```no_run
/// use fnpack_core::ignore::load_ignore_rules;
/// use std::path::Path;
///
/// let rules = load_ignore_rules(Path::new("./function"))?;
/// println!("{} ignore rules", rules.len());
/// # Ok::<(), fnpack_core::PackError>(())
/// ```
///
/// # Errors
///
/// Returns an error if the ignore file exists but cannot be read, or if an
/// included file contains a nested include.
pub fn load_ignore_rules(dir: &Path) -> Result<IgnoreRuleSet> {
    load_ignore_rules_with(dir, &PackConfig::default())
}

/// Loads the ignore file named by `config` from the root of `dir`.
///
/// # Errors
///
/// Same as [`load_ignore_rules`].
pub fn load_ignore_rules_with(dir: &Path, config: &PackConfig) -> Result<IgnoreRuleSet> {
    let path = dir.join(&config.ignore_file_name);
    let Some(lines) = read_rule_lines(&path)? else {
        tracing::debug!(path = %path.display(), "no ignore file");
        return Ok(IgnoreRuleSet::new());
    };

    let mut rules = Vec::with_capacity(lines.len());
    for line in lines {
        match line.strip_prefix(INCLUDE_DIRECTIVE) {
            Some(target) if config.expand_includes => {
                rules.extend(read_included(dir, &path, target.trim())?);
            }
            _ => rules.push(line),
        }
    }

    tracing::debug!(path = %path.display(), rules = rules.len(), "loaded ignore file");
    Ok(IgnoreRuleSet::from(rules))
}

/// Reads trimmed lines; `Ok(None)` when the file does not exist.
fn read_rule_lines(path: &Path) -> Result<Option<Vec<String>>> {
    match std::fs::read(path) {
        Ok(bytes) => {
            let text = String::from_utf8(bytes).map_err(|e| PackError::InvalidIgnoreFile {
                path: path.to_path_buf(),
                reason: format!("not valid UTF-8: {}", e.utf8_error()),
            })?;
            Ok(Some(text.lines().map(|line| trim_rule(line).to_string()).collect()))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(PackError::IgnoreFileRead {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Trims surrounding whitespace but keeps a trailing space escaped with `\\`.
fn trim_rule(line: &str) -> &str {
    let line = line.trim_start();
    let trimmed = line.trim_end();
    let escapes = trimmed.bytes().rev().take_while(|&b| b == b'\\').count();
    if escapes % 2 == 1 && line[trimmed.len()..].starts_with(' ') {
        &line[..=trimmed.len()]
    } else {
        trimmed
    }
}

fn read_included(dir: &Path, ignore_file: &Path, target: &str) -> Result<Vec<String>> {
    if target.is_empty() {
        return Err(PackError::InvalidIgnoreFile {
            path: ignore_file.to_path_buf(),
            reason: format!("{INCLUDE_DIRECTIVE} requires a file name"),
        });
    }

    let included = dir.join(target);
    let Some(lines) = read_rule_lines(&included)? else {
        tracing::warn!(
            path = %included.display(),
            "included ignore file does not exist, skipping"
        );
        return Ok(Vec::new());
    };

    if lines.iter().any(|line| line.starts_with(INCLUDE_DIRECTIVE)) {
        return Err(PackError::InvalidIgnoreFile {
            path: included,
            reason: "included files cannot include other files".to_string(),
        });
    }

    Ok(lines)
}
