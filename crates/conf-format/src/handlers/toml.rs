//! TOML format handler
//!
//! TOML comments are not preserved; the toml crate drops them while
//! parsing and this handler does not attempt raw-source recovery. Key
//! order is kept through the crate's `preserve_order` feature. On encode,
//! non-table entries are emitted before tables within each level, which
//! the TOML document model requires.

use toml::Value as TomlValue;

use crate::error::{Error, Result};
use crate::format::{Format, FormatHandler};
use conf_tree::{Map, PathTree, Value};

/// Handler for TOML files
#[derive(Debug, Default)]
pub struct TomlHandler;

impl TomlHandler {
    pub fn new() -> Self {
        Self
    }
}

impl FormatHandler for TomlHandler {
    fn format(&self) -> Format {
        Format::Toml
    }

    fn decode(&self, source: &str) -> Result<PathTree> {
        let table: toml::Table =
            toml::from_str(source).map_err(|e| Error::parse("TOML", e.to_string()))?;
        let mut root = Map::new();
        for (key, value) in &table {
            root.insert(key.clone(), toml_to_value(value));
        }
        Ok(PathTree::from_root(root))
    }

    fn encode(&self, tree: &PathTree, _preserve_comments: bool) -> Result<String> {
        let table = map_to_toml(tree.root());
        toml::to_string_pretty(&table).map_err(|e| Error::serialize("TOML", e.to_string()))
    }
}

fn toml_to_value(value: &TomlValue) -> Value {
    match value {
        TomlValue::String(s) => Value::Scalar(s.clone()),
        TomlValue::Integer(i) => Value::Scalar(i.to_string()),
        TomlValue::Float(f) => Value::Scalar(f.to_string()),
        TomlValue::Boolean(b) => Value::Scalar(b.to_string()),
        TomlValue::Datetime(dt) => Value::Scalar(dt.to_string()),
        TomlValue::Array(items) => Value::List(items.iter().map(toml_to_value).collect()),
        TomlValue::Table(table) => {
            let mut map = Map::new();
            for (key, value) in table {
                map.insert(key.clone(), toml_to_value(value));
            }
            Value::Map(map)
        }
    }
}

fn map_to_toml(map: &Map) -> toml::Table {
    let mut scalars = toml::Table::new();
    let mut tables = toml::Table::new();
    for (key, value) in map.entries() {
        if value.is_marker() {
            continue;
        }
        let converted = value_to_toml(value);
        match converted {
            TomlValue::Table(_) => tables.insert(key.clone(), converted),
            _ => scalars.insert(key.clone(), converted),
        };
    }
    for (key, value) in tables {
        scalars.insert(key, value);
    }
    scalars
}

fn value_to_toml(value: &Value) -> TomlValue {
    match value {
        Value::Scalar(text) => retype_scalar(text),
        Value::List(items) => TomlValue::Array(items.iter().map(value_to_toml).collect()),
        Value::Map(map) => TomlValue::Table(map_to_toml(map)),
        Value::Comment(_) | Value::Blank => TomlValue::String(String::new()),
    }
}

fn retype_scalar(text: &str) -> TomlValue {
    if text == "true" || text == "false" {
        return TomlValue::Boolean(text == "true");
    }
    if let Ok(i) = text.parse::<i64>() {
        return TomlValue::Integer(i);
    }
    if text.contains(['.', 'e', 'E']) {
        if let Ok(f) = text.parse::<f64>() {
            return TomlValue::Float(f);
        }
    }
    TomlValue::String(text.to_string())
}
