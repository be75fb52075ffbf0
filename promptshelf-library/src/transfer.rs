//! Import and export of the whole library
//!
//! Two file shapes are accepted: the legacy bare forest array, and an
//! object `{ "forest": [...], "variableHistory": {...} }`. Exports always
//! use the object shape.

use crate::error::{LibraryError, Result};
use crate::history::VariableHistory;
use std::collections::BTreeMap;
use crate::tree::Forest;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Full library snapshot as written by `export`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryExport {
    pub forest: Forest,
    #[serde(default)]
    pub variable_history: VariableHistory,
}

/// Which file shape an import used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportShape {
    /// Bare forest array, no history
    Legacy,
    /// Object carrying both forest and history
    Full,
}

/// A validated import, ready to replace the library contents
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedLibrary {
    pub shape: ImportShape,
    pub forest: Forest,
    /// `None` for legacy files, whose import keeps the current history
    pub history: Option<VariableHistory>,
}

/// Parse and validate an import file
///
/// Every node is checked before anything is returned, so a file with a
/// single bad node is rejected as a whole. The error names the offending
/// node by its position, e.g. `forest[2].children[0]`. Imported history
/// lists keep at most `history_capacity` values.
pub fn parse_import(text: &str, history_capacity: usize) -> Result<ImportedLibrary> {
    let document: Value = serde_json::from_str(text)
        .map_err(|err| LibraryError::invalid_import("$", format!("not valid JSON: {err}")))?;

    let (shape, forest_value, history_value) = match document {
        Value::Array(nodes) => (ImportShape::Legacy, Value::Array(nodes), None),
        Value::Object(mut object) => {
            let forest = object
                .remove("forest")
                .ok_or_else(|| LibraryError::invalid_import("$", "missing 'forest' array"))?;
            let history = object.remove("variableHistory");
            (ImportShape::Full, forest, history)
        }
        _ => {
            return Err(LibraryError::invalid_import(
                "$",
                "expected a forest array or an object with a 'forest' array",
            ))
        }
    };

    let Value::Array(nodes) = &forest_value else {
        return Err(LibraryError::invalid_import("forest", "must be an array"));
    };
    let mut seen = HashSet::new();
    validate_nodes(nodes, "forest", &mut seen)?;

    let forest: Forest = serde_json::from_value(forest_value)
        .map_err(|err| LibraryError::invalid_import("forest", err.to_string()))?;

    let history = match (shape, history_value) {
        (ImportShape::Legacy, _) => None,
        (ImportShape::Full, None | Some(Value::Null)) => {
            Some(VariableHistory::with_capacity(history_capacity))
        }
        (ImportShape::Full, Some(value)) => {
            let raw: BTreeMap<String, Vec<String>> = serde_json::from_value(value)
                .map_err(|err| LibraryError::invalid_import("variableHistory", err.to_string()))?;
            Some(VariableHistory::from_raw(raw, history_capacity))
        }
    };

    Ok(ImportedLibrary {
        shape,
        forest,
        history,
    })
}

fn validate_nodes<'a>(nodes: &'a [Value], path: &str, seen: &mut HashSet<&'a str>) -> Result<()> {
    for (index, value) in nodes.iter().enumerate() {
        let node_path = format!("{path}[{index}]");
        let Value::Object(node) = value else {
            return Err(LibraryError::invalid_import(node_path, "node must be an object"));
        };
        validate_node(node, &node_path, seen)?;
    }
    Ok(())
}

fn validate_node<'a>(
    node: &'a Map<String, Value>,
    path: &str,
    seen: &mut HashSet<&'a str>,
) -> Result<()> {
    let id = match node.get("id") {
        Some(Value::String(id)) if !id.is_empty() => id.as_str(),
        _ => return Err(LibraryError::invalid_import(path, "missing or empty 'id'")),
    };
    if !seen.insert(id) {
        return Err(LibraryError::invalid_import(
            path,
            format!("duplicate id '{id}'"),
        ));
    }

    match node.get("title") {
        Some(Value::String(title)) if !title.trim().is_empty() => {}
        _ => return Err(LibraryError::invalid_import(path, "missing or empty 'title'")),
    }

    match node.get("type").and_then(Value::as_str) {
        Some("prompt") => Ok(()),
        Some("folder") => match node.get("children") {
            None | Some(Value::Null) => Ok(()),
            Some(Value::Array(children)) => {
                validate_nodes(children, &format!("{path}.children"), seen)
            }
            Some(_) => Err(LibraryError::invalid_import(path, "'children' must be an array")),
        },
        Some(other) => Err(LibraryError::invalid_import(
            path,
            format!("unknown node type '{other}'"),
        )),
        None => Err(LibraryError::invalid_import(path, "missing 'type'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::DEFAULT_HISTORY_CAPACITY;
    use serde_json::json;

    fn import(text: &str) -> Result<ImportedLibrary> {
        parse_import(text, DEFAULT_HISTORY_CAPACITY)
    }

    fn reason(result: Result<ImportedLibrary>) -> (String, String) {
        match result {
            Err(LibraryError::InvalidImport { path, reason }) => (path, reason),
            other => panic!("expected invalid import, got {other:?}"),
        }
    }

    #[test]
    fn test_legacy_array() {
        let text = json!([
            {"id": "1", "type": "prompt", "title": "Hi", "content": "Hello {{name}}"},
            {"id": "2", "type": "folder", "title": "Work", "children": null, "isOpen": true}
        ])
        .to_string();

        let imported = import(&text).unwrap();
        assert_eq!(imported.shape, ImportShape::Legacy);
        assert_eq!(imported.forest.len(), 2);
        assert!(imported.history.is_none());
    }

    #[test]
    fn test_full_object() {
        let text = json!({
            "forest": [
                {"id": "f", "type": "folder", "title": "Work", "children": [
                    {"id": "p", "type": "prompt", "title": "Review", "content": "{{lang}}"}
                ]}
            ],
            "variableHistory": {"lang": ["rust", "go"]}
        })
        .to_string();

        let imported = import(&text).unwrap();
        assert_eq!(imported.shape, ImportShape::Full);
        assert!(imported.forest.find("p").is_some());
        assert_eq!(imported.history.unwrap().values("lang"), ["rust", "go"]);
    }

    #[test]
    fn test_history_bounded_by_requested_capacity() {
        let values: Vec<String> = (0..8).rev().map(|i| format!("v{i}")).collect();
        let text = json!({"forest": [], "variableHistory": {"x": values}}).to_string();

        let imported = parse_import(&text, 10).unwrap();
        assert_eq!(imported.history.unwrap().values("x"), values.as_slice());

        let imported = parse_import(&text, 5).unwrap();
        assert_eq!(
            imported.history.unwrap().values("x"),
            ["v7", "v6", "v5", "v4", "v3"]
        );
    }

    #[test]
    fn test_full_object_without_history() {
        let imported = import(r#"{"forest": []}"#).unwrap();
        assert!(imported.history.unwrap().is_empty());
    }

    #[test]
    fn test_nested_invalid_node_rejects_file() {
        let text = json!([
            {"id": "1", "type": "folder", "title": "Ok", "children": [
                {"id": "2", "type": "prompt", "title": "Fine", "content": ""},
                {"id": "3", "type": "prompt", "title": "   ", "content": ""}
            ]}
        ])
        .to_string();

        let (path, reason) = reason(import(&text));
        assert_eq!(path, "forest[0].children[1]");
        assert!(reason.contains("title"));
    }

    #[test]
    fn test_rejections() {
        let (path, _) = reason(import(r#"[{"type": "prompt", "title": "x"}]"#));
        assert_eq!(path, "forest[0]");

        let (_, reason_text) = reason(import(
            r#"[{"id": "1", "type": "snippet", "title": "x"}]"#,
        ));
        assert!(reason_text.contains("snippet"));

        let (path, reason_text) = reason(import(
            r#"[{"id": "1", "type": "prompt", "title": "a"}, {"id": "1", "type": "prompt", "title": "b"}]"#,
        ));
        assert_eq!(path, "forest[1]");
        assert!(reason_text.contains("duplicate"));

        let (path, _) = reason(import(r#"{"nodes": []}"#));
        assert_eq!(path, "$");
        let (path, _) = reason(import("not json"));
        assert_eq!(path, "$");
        let (path, _) = reason(import("42"));
        assert_eq!(path, "$");
    }

    #[test]
    fn test_export_shape() {
        let mut history = VariableHistory::new();
        history.record_value("x", "1");
        let export = LibraryExport {
            forest: Forest::new(),
            variable_history: history,
        };
        assert_eq!(
            serde_json::to_value(&export).unwrap(),
            json!({"forest": [], "variableHistory": {"x": ["1"]}})
        );
    }
}
