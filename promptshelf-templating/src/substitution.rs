//! Writing resolved values back into a template
//!
//! Each variable name is escaped and compiled into its own pattern, so names
//! such as `a.b*c` only ever match themselves. Matches are collected against
//! the original text and spliced in a single pass; a value that itself looks
//! like a placeholder is never expanded again.

use crate::error::{Result, TemplatingError};
use crate::parser::placeholder_spans;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::ops::Range;

/// Pattern matching `{{name}}` and `{{name|anything}}` for one variable
///
/// Whitespace around the name is tolerated on the same line, mirroring the
/// trimming the parser applies.
pub fn placeholder_pattern(name: &str) -> Result<Regex> {
    let pattern = format!(
        r"\{{\{{[^\S\n]*{}[^\S\n]*(?:\|.*?)?\}}\}}",
        regex::escape(name)
    );
    Regex::new(&pattern).map_err(|source| TemplatingError::Pattern {
        name: name.to_string(),
        source,
    })
}

/// Replace every placeholder whose name has an answer
///
/// Placeholders without an answer are left untouched.
pub fn substitute(text: &str, answers: &HashMap<String, String>) -> Result<String> {
    // Only whole placeholders as the parser sees them are eligible, so a
    // name can't match inside a longer marker like `{{{a}}`.
    let placeholders: HashSet<(usize, usize)> = placeholder_spans(text)
        .into_iter()
        .map(|p| (p.span.start, p.span.end))
        .collect();

    let mut replacements: Vec<(Range<usize>, &str)> = Vec::new();
    for (name, value) in answers {
        let pattern = placeholder_pattern(name)?;
        replacements.extend(
            pattern
                .find_iter(text)
                .filter(|m| placeholders.contains(&(m.start(), m.end())))
                .map(|m| (m.range(), value.as_str())),
        );
    }
    replacements.sort_by_key(|(range, _)| range.start);

    let mut output = String::with_capacity(text.len());
    let mut cursor = 0;
    for (range, value) in replacements {
        if range.start < cursor {
            continue;
        }
        output.push_str(&text[cursor..range.start]);
        output.push_str(value);
        cursor = range.end;
    }
    output.push_str(&text[cursor..]);

    Ok(output)
}
