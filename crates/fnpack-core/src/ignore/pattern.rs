//! Git pattern syntax the glob compiler does not read natively.
//!
//! Each rule line is rewritten before it reaches the gitignore compiler:
//! POSIX bracket classes such as `[[:digit:]]` become plain ranges, and `{`
//! and `}` are escaped because git has no brace alternation.

use std::borrow::Cow;

/// Rewrites one ignore-file line into the glob dialect of the compiler.
///
/// Lines without POSIX classes or braces are returned unchanged. Unknown
/// class names are left alone, so they fail to match like they do in git.
///
/// # Examples
///
/// ```
/// use fnpack_core::ignore::pattern::to_glob_syntax;
///
/// assert_eq!(to_glob_syntax("*.log"), "*.log");
/// assert_eq!(to_glob_syntax("[[:digit:]].txt"), "[0-9].txt");
/// assert_eq!(to_glob_syntax("{a,b}.js"), r"\{a,b\}.js");
/// ```
#[must_use]
pub fn to_glob_syntax(line: &str) -> Cow<'_, str> {
    if !line.contains(['{', '}']) && !line.contains("[:") {
        return Cow::Borrowed(line);
    }

    let mut out = String::with_capacity(line.len() + 8);
    let mut rest = line;
    let mut in_class = false;
    // a `]` right after the opening bracket is a literal member
    let mut class_start = false;

    while let Some(c) = rest.chars().next() {
        rest = &rest[c.len_utf8()..];

        if in_class {
            if c == '[' && rest.starts_with(':') {
                if let Some((set, after)) = rest[1..]
                    .split_once(":]")
                    .and_then(|(name, after)| posix_class(name).map(|set| (set, after)))
                {
                    out.push_str(set);
                    rest = after;
                    class_start = false;
                    continue;
                }
            }
            if c == ']' && !class_start {
                in_class = false;
            }
            class_start = false;
            out.push(c);
            continue;
        }

        match c {
            '\\' => {
                out.push(c);
                if let Some(next) = rest.chars().next() {
                    out.push(next);
                    rest = &rest[next.len_utf8()..];
                }
            }
            '[' => {
                out.push(c);
                in_class = true;
                class_start = true;
                if let Some(negation @ ('!' | '^')) = rest.chars().next() {
                    out.push(negation);
                    rest = &rest[1..];
                }
            }
            '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }

    Cow::Owned(out)
}

/// ASCII members of a POSIX class, written so none starts with `!`, `^` or `]`.
fn posix_class(name: &str) -> Option<&'static str> {
    let set = match name {
        "alnum" => "0-9A-Za-z",
        "alpha" => "A-Za-z",
        "blank" => " \t",
        "cntrl" => "\u{0}-\u{1f}\u{7f}",
        "digit" => "0-9",
        "graph" => "\"-~!",
        "lower" => "a-z",
        "print" => " -~",
        "punct" => ":-@!-/[-`{-~",
        "space" => " \t\n\r\u{b}\u{c}",
        "upper" => "A-Z",
        "xdigit" => "0-9A-Fa-f",
        _ => return None,
    };
    Some(set)
}
