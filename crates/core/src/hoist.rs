//! Pattern-based extraction of top-level tag blocks.
//!
//! Hoisting has no structural awareness: every span the pattern recognizes is
//! treated as one block, wherever it sits. Nested blocks of the same kind are
//! not distinguished from unrelated inner content.

use regex::Regex;

/// Blocks pulled out of a piece of markup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hoisted {
    /// Every match, in document order.
    pub matches: Vec<String>,
    /// The markup with all matched spans removed.
    pub remainder: String,
}

/// Extracts every non-overlapping match of `pattern` from `markup`.
///
/// Patterns must consume at least one character per match. Empty matches are
/// never collected.
///
/// # Examples
///
/// ```
/// use regex::Regex;
/// use svpage_core::hoist;
///
/// let re = Regex::new(r"<b>[^<]*</b>").unwrap();
/// let out = hoist(&re, "a<b>1</b>c<b>2</b>d");
/// assert_eq!(out.matches, ["<b>1</b>", "<b>2</b>"]);
/// assert_eq!(out.remainder, "acd");
/// ```
pub fn hoist(pattern: &Regex, markup: &str) -> Hoisted {
    let mut matches = Vec::new();
    let mut remainder = String::with_capacity(markup.len());
    let mut last_end = 0;

    for found in pattern.find_iter(markup) {
        debug_assert!(
            !found.is_empty(),
            "tag pattern `{pattern}` produced an empty match"
        );
        if found.is_empty() {
            continue;
        }
        remainder.push_str(&markup[last_end..found.start()]);
        matches.push(found.as_str().to_string());
        last_end = found.end();
    }

    if matches.is_empty() {
        return Hoisted {
            matches,
            remainder: markup.to_string(),
        };
    }

    remainder.push_str(&markup[last_end..]);
    Hoisted { matches, remainder }
}

/// Returns the first match of `pattern` in `markup`, if any.
pub fn first_match(pattern: &Regex, markup: &str) -> Option<String> {
    pattern
        .find_iter(markup)
        .find(|m| !m.is_empty())
        .map(|m| m.as_str().to_string())
}
