//! Placeholder scanning
//!
//! A placeholder is `{{` + raw + `}}` on a single line, matched lazily so the
//! first `}}` closes it. The raw text is `Name` or `Name|Default`, both sides
//! trimmed. A `{{` without a closing `}}` is not a placeholder.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::Range;

static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{(.*?)\}\}").expect("placeholder pattern is valid"));

/// A variable the user must supply before a prompt can be injected
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableDeclaration {
    /// Trimmed variable name, may be empty for `{{}}`
    pub name: String,
    /// Trimmed default value, empty when none was given
    pub default_value: String,
}

impl VariableDeclaration {
    /// Create a declaration
    pub fn new(name: impl Into<String>, default_value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_value: default_value.into(),
        }
    }

    /// Whether the placeholder carried a non-empty default
    pub fn has_default(&self) -> bool {
        !self.default_value.is_empty()
    }
}

/// One placeholder occurrence in a text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// Byte range of the whole `{{...}}` marker
    pub span: Range<usize>,
    /// Trimmed name
    pub name: String,
    /// Trimmed default, empty when absent
    pub default_value: String,
}

/// Split `Name|Default` the way the side panel always has: only the first
/// two `|`-separated segments count.
fn split_raw(raw: &str) -> (&str, &str) {
    let mut parts = raw.split('|');
    let name = parts.next().unwrap_or_default().trim();
    let default_value = parts.next().unwrap_or_default().trim();
    (name, default_value)
}

/// Every placeholder occurrence in `text`, in order
pub fn placeholder_spans(text: &str) -> Vec<Placeholder> {
    PLACEHOLDER_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let (name, default_value) = split_raw(caps.get(1)?.as_str());
            Some(Placeholder {
                span: whole.range(),
                name: name.to_string(),
                default_value: default_value.to_string(),
            })
        })
        .collect()
}

/// Unique variable declarations in order of first appearance
///
/// The first occurrence of a name decides its default; later occurrences,
/// even with a different default, fold into it.
pub fn parse_declarations(text: &str) -> Vec<VariableDeclaration> {
    let mut seen = HashSet::new();
    let declarations: Vec<VariableDeclaration> = placeholder_spans(text)
        .into_iter()
        .filter(|placeholder| seen.insert(placeholder.name.clone()))
        .map(|placeholder| VariableDeclaration::new(placeholder.name, placeholder.default_value))
        .collect();

    tracing::trace!("Parsed {} variable declarations", declarations.len());
    declarations
}
