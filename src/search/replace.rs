//! Replacement text expansion.

use regex::Captures;

/// Expand `$n` references in `replacement` against `caps`.
///
/// `n` is a single digit: `$0` is the whole match, `$1`..`$9` the capture
/// groups. A group that does not exist or did not take part in the match
/// expands to nothing. A `$` not followed by a digit is kept as typed.
pub fn expand_backreferences(replacement: &str, caps: &Captures<'_>) -> String {
    let mut out = String::with_capacity(replacement.len());
    let mut chars = replacement.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        match chars.peek().and_then(|d| d.to_digit(10)) {
            Some(group) => {
                chars.next();
                if let Some(m) = caps.get(group as usize) {
                    out.push_str(m.as_str());
                }
            }
            None => out.push(c),
        }
    }

    out
}
