//! YAML format handler using serde_yaml
//!
//! serde_yaml drops comments while parsing, so the handler scans the raw
//! source for the contiguous comment lines at the top and bottom of the
//! file and carries them as header/footer markers in the tree. Comments
//! inside the body are not preserved.

use serde_yaml::Value as YamlValue;

use crate::error::{Error, Result};
use crate::format::{Format, FormatHandler};
use conf_tree::{Map, PathTree, Value};

/// Handler for YAML files
#[derive(Debug, Default)]
pub struct YamlHandler;

impl YamlHandler {
    pub fn new() -> Self {
        Self
    }
}

impl FormatHandler for YamlHandler {
    fn format(&self) -> Format {
        Format::Yaml
    }

    fn decode(&self, source: &str) -> Result<PathTree> {
        let (header, footer) = comment_margins(source);

        let value: YamlValue =
            serde_yaml::from_str(source).map_err(|e| Error::parse("YAML", e.to_string()))?;
        let mut root = Map::new();
        match value {
            YamlValue::Null => {}
            YamlValue::Mapping(mapping) => {
                for (key, value) in &mapping {
                    let key = key_text(key)?;
                    root.insert(key, yaml_to_value(value)?);
                }
            }
            _ => return Err(Error::parse("YAML", "root must be a mapping")),
        }

        let mut tree = PathTree::from_root(root);
        for line in header.iter().rev() {
            tree.root_mut()
                .insert_marker_at(0, Value::Comment(line.clone()));
        }
        for line in footer {
            tree.root_mut().push_comment(line);
        }
        Ok(tree)
    }

    fn encode(&self, tree: &PathTree, preserve_comments: bool) -> Result<String> {
        let mut mapping = serde_yaml::Mapping::new();
        for (key, value) in tree.root().entries() {
            if value.is_marker() {
                continue;
            }
            mapping.insert(YamlValue::String(key.clone()), value_to_yaml(value));
        }
        let body = serde_yaml::to_string(&mapping)
            .map_err(|e| Error::serialize("YAML", e.to_string()))?;

        if !preserve_comments {
            return Ok(body);
        }

        let mut out = String::new();
        for line in crate::comment::header(tree, None) {
            out.push_str(&line);
            out.push('\n');
        }
        // An empty mapping serializes as "{}"; skip it when the tree holds
        // no real entries.
        if tree.root().keys().next().is_some() {
            out.push_str(&body);
        }
        for line in crate::comment::footer(tree, None) {
            out.push_str(&line);
            out.push('\n');
        }
        Ok(out)
    }
}

/// Contiguous comment lines at the top and bottom of the source.
fn comment_margins(source: &str) -> (Vec<String>, Vec<String>) {
    let lines: Vec<&str> = source.lines().collect();
    let header: Vec<String> = lines
        .iter()
        .map_while(|line| {
            let trimmed = line.trim();
            trimmed.starts_with('#').then(|| trimmed.to_string())
        })
        .collect();
    if header.len() == lines.len() {
        // All-comment file: everything is header, nothing left for a footer.
        return (header, Vec::new());
    }
    let mut footer: Vec<String> = lines
        .iter()
        .rev()
        .map_while(|line| {
            let trimmed = line.trim();
            trimmed.starts_with('#').then(|| trimmed.to_string())
        })
        .collect();
    footer.reverse();
    (header, footer)
}

fn key_text(key: &YamlValue) -> Result<String> {
    match key {
        YamlValue::String(s) => Ok(s.clone()),
        YamlValue::Number(n) => Ok(n.to_string()),
        YamlValue::Bool(b) => Ok(b.to_string()),
        _ => Err(Error::parse("YAML", "unsupported mapping key type")),
    }
}

fn yaml_to_value(value: &YamlValue) -> Result<Value> {
    match value {
        YamlValue::Null => Ok(Value::Scalar("null".to_string())),
        YamlValue::Bool(b) => Ok(Value::Scalar(b.to_string())),
        YamlValue::Number(n) => Ok(Value::Scalar(n.to_string())),
        YamlValue::String(s) => Ok(Value::Scalar(s.clone())),
        YamlValue::Sequence(items) => Ok(Value::List(
            items.iter().map(yaml_to_value).collect::<Result<_>>()?,
        )),
        YamlValue::Mapping(mapping) => {
            let mut map = Map::new();
            for (key, value) in mapping {
                map.insert(key_text(key)?, yaml_to_value(value)?);
            }
            Ok(Value::Map(map))
        }
        YamlValue::Tagged(tagged) => yaml_to_value(&tagged.value),
    }
}

fn value_to_yaml(value: &Value) -> YamlValue {
    match value {
        Value::Scalar(text) => retype_scalar(text),
        Value::List(items) => YamlValue::Sequence(items.iter().map(value_to_yaml).collect()),
        Value::Map(map) => {
            let mut mapping = serde_yaml::Mapping::new();
            for (key, value) in map.entries() {
                if value.is_marker() {
                    continue;
                }
                mapping.insert(YamlValue::String(key.clone()), value_to_yaml(value));
            }
            YamlValue::Mapping(mapping)
        }
        Value::Comment(_) | Value::Blank => YamlValue::Null,
    }
}

fn retype_scalar(text: &str) -> YamlValue {
    if text == "null" {
        return YamlValue::Null;
    }
    if text == "true" || text == "false" {
        return YamlValue::Bool(text == "true");
    }
    if let Ok(i) = text.parse::<i64>() {
        return YamlValue::Number(i.into());
    }
    if text.contains(['.', 'e', 'E']) {
        if let Ok(f) = text.parse::<f64>() {
            return YamlValue::Number(f.into());
        }
    }
    YamlValue::String(text.to_string())
}
