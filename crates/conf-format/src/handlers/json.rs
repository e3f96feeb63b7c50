//! JSON format handler using serde_json
//!
//! JSON has no comment syntax, so layout markers are dropped on encode
//! regardless of the preserve flag. Key order is kept through the
//! `preserve_order` feature of serde_json.

use serde_json::Value as JsonValue;

use crate::error::{Error, Result};
use crate::format::{Format, FormatHandler};
use conf_tree::{Map, PathTree, Value};

/// Handler for JSON files
#[derive(Debug, Default)]
pub struct JsonHandler;

impl JsonHandler {
    pub fn new() -> Self {
        Self
    }
}

impl FormatHandler for JsonHandler {
    fn format(&self) -> Format {
        Format::Json
    }

    fn decode(&self, source: &str) -> Result<PathTree> {
        if source.trim().is_empty() {
            return Ok(PathTree::new());
        }
        let value: JsonValue =
            serde_json::from_str(source).map_err(|e| Error::parse("JSON", e.to_string()))?;
        let JsonValue::Object(object) = value else {
            return Err(Error::parse("JSON", "root must be an object"));
        };
        let mut root = Map::new();
        for (key, value) in object {
            root.insert(key, json_to_value(&value));
        }
        Ok(PathTree::from_root(root))
    }

    fn encode(&self, tree: &PathTree, _preserve_comments: bool) -> Result<String> {
        let value = JsonValue::Object(map_to_json(tree.root()));
        let mut text = serde_json::to_string_pretty(&value)
            .map_err(|e| Error::serialize("JSON", e.to_string()))?;
        text.push('\n');
        Ok(text)
    }
}

fn json_to_value(value: &JsonValue) -> Value {
    match value {
        JsonValue::Null => Value::Scalar("null".to_string()),
        JsonValue::Bool(b) => Value::Scalar(b.to_string()),
        JsonValue::Number(n) => Value::Scalar(n.to_string()),
        JsonValue::String(s) => Value::Scalar(s.clone()),
        JsonValue::Array(items) => Value::List(items.iter().map(json_to_value).collect()),
        JsonValue::Object(object) => {
            let mut map = Map::new();
            for (key, value) in object {
                map.insert(key.clone(), json_to_value(value));
            }
            Value::Map(map)
        }
    }
}

fn map_to_json(map: &Map) -> serde_json::Map<String, JsonValue> {
    let mut out = serde_json::Map::new();
    for (key, value) in map.entries() {
        if value.is_marker() {
            continue;
        }
        out.insert(key.clone(), value_to_json(value));
    }
    out
}

fn value_to_json(value: &Value) -> JsonValue {
    match value {
        Value::Scalar(text) => retype_scalar(text),
        Value::List(items) => JsonValue::Array(items.iter().map(value_to_json).collect()),
        Value::Map(map) => JsonValue::Object(map_to_json(map)),
        Value::Comment(_) | Value::Blank => JsonValue::Null,
    }
}

/// Best-fit typing for a text scalar: null, bool, integer, float, else
/// string. Scalars are carried as text inside the tree; this restores the
/// natural JSON type on the way out.
fn retype_scalar(text: &str) -> JsonValue {
    if text == "null" {
        return JsonValue::Null;
    }
    if text == "true" || text == "false" {
        return JsonValue::Bool(text == "true");
    }
    if let Ok(i) = text.parse::<i64>() {
        return JsonValue::Number(i.into());
    }
    if text.contains(['.', 'e', 'E']) {
        if let Ok(f) = text.parse::<f64>() {
            if let Some(n) = serde_json::Number::from_f64(f) {
                return JsonValue::Number(n);
            }
        }
    }
    JsonValue::String(text.to_string())
}
