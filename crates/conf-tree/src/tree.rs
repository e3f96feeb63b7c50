//! The path-addressed tree and its traversal operations

use crate::path::parse_path;
use crate::value::{Map, Value};

/// Nested ordered map addressed by dotted key paths.
///
/// Absence of a key is a normal result, never an error: `get` returns
/// `None` and `contains` returns `false` for missing or invalid paths. An
/// intermediate segment that resolves to something other than a map makes
/// the rest of the path absent for reads; `insert` destructively replaces
/// such an intermediate with a fresh map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathTree {
    root: Map,
}

impl PathTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_root(root: Map) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Map {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Map {
        &mut self.root
    }

    pub fn into_root(self) -> Map {
        self.root
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Resolve a dotted path to its value.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let segments = parse_path(path)?;
        let (last, parents) = segments.split_last()?;
        let mut map = &self.root;
        for segment in parents {
            map = map.get(segment)?.as_map()?;
        }
        map.get(last)
    }

    /// Resolve a dotted path to a mutable value.
    pub fn get_mut(&mut self, path: &str) -> Option<&mut Value> {
        let segments = parse_path(path)?;
        let (last, parents) = segments.split_last()?;
        let mut map = &mut self.root;
        for segment in parents {
            map = match map.get_mut(segment) {
                Some(Value::Map(child)) => child,
                _ => return None,
            };
        }
        map.get_mut(last)
    }

    /// Insert a value at a dotted path, creating intermediate maps as
    /// needed. A non-map intermediate is replaced with a fresh map,
    /// discarding its old value.
    ///
    /// Returns the previous value at the path for an overwrite. An invalid
    /// path is a no-op.
    pub fn insert(&mut self, path: &str, value: Value) -> Option<Value> {
        let segments = parse_path(path)?;
        insert_into(&mut self.root, &segments, value)
    }

    /// Remove the value at a dotted path, then prune every ancestor map the
    /// removal left empty.
    ///
    /// Returns the removed value if the path was present.
    pub fn remove(&mut self, path: &str) -> Option<Value> {
        let segments = parse_path(path)?;
        remove_from(&mut self.root, &segments)
    }

    /// Fully-qualified dotted keys of all leaves in the tree.
    pub fn keys(&self) -> Vec<String> {
        let mut out = Vec::new();
        collect_keys(&self.root, "", &mut out);
        out
    }

    /// Fully-qualified dotted keys of all leaves at or under `path`.
    ///
    /// Empty when the path is absent or not a map.
    pub fn keys_at(&self, path: &str) -> Vec<String> {
        let mut out = Vec::new();
        if let Some(Value::Map(map)) = self.get(path) {
            collect_keys(map, path, &mut out);
        }
        out
    }

    /// Immediate child names of the root, no recursion.
    pub fn block_keys(&self) -> Vec<String> {
        self.root.keys().map(str::to_string).collect()
    }

    /// Immediate child names under `path`, no recursion.
    pub fn block_keys_at(&self, path: &str) -> Vec<String> {
        match self.get(path) {
            Some(Value::Map(map)) => map.keys().map(str::to_string).collect(),
            _ => Vec::new(),
        }
    }

    /// Count of leaves transitively in the tree.
    pub fn len(&self) -> usize {
        count_leaves(&self.root)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Count of leaves transitively under `path`.
    pub fn len_at(&self, path: &str) -> usize {
        match self.get(path) {
            Some(Value::Map(map)) => count_leaves(map),
            Some(_) => 1,
            None => 0,
        }
    }
}

fn insert_into(map: &mut Map, segments: &[&str], value: Value) -> Option<Value> {
    match segments {
        [] => None,
        [last] => map.insert(*last, value),
        [head, rest @ ..] => {
            if !matches!(map.get(head), Some(Value::Map(_))) {
                map.insert(*head, Value::Map(Map::new()));
            }
            match map.get_mut(head) {
                Some(Value::Map(child)) => insert_into(child, rest, value),
                _ => None,
            }
        }
    }
}

fn remove_from(map: &mut Map, segments: &[&str]) -> Option<Value> {
    match segments {
        [] => None,
        [last] => map.remove(last),
        [head, rest @ ..] => {
            let removed = match map.get_mut(head) {
                Some(Value::Map(child)) => remove_from(child, rest)?,
                _ => return None,
            };
            // Prune the intermediate when nothing is left in it, layout
            // markers included.
            let now_empty = map
                .get(head)
                .and_then(Value::as_map)
                .is_some_and(Map::is_empty);
            if now_empty {
                map.remove(head);
            }
            Some(removed)
        }
    }
}

fn collect_keys(map: &Map, prefix: &str, out: &mut Vec<String>) {
    for (name, value) in map.entries() {
        if value.is_marker() {
            continue;
        }
        let full = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}.{name}")
        };
        match value {
            Value::Map(child) => collect_keys(child, &full, out),
            _ => out.push(full),
        }
    }
}

fn count_leaves(map: &Map) -> usize {
    map.entries()
        .iter()
        .map(|(_, value)| match value {
            Value::Map(child) => count_leaves(child),
            value if value.is_marker() => 0,
            _ => 1,
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_get_after_insert() {
        let mut tree = PathTree::new();
        tree.insert("a.b.c", Value::from("x"));
        assert_eq!(tree.get("a.b.c"), Some(&Value::from("x")));
        assert!(tree.contains("a.b.c"));
        assert!(tree.contains("a.b"));
    }

    #[test]
    fn test_get_absent_is_none() {
        let tree = PathTree::new();
        assert_eq!(tree.get("missing"), None);
        assert!(!tree.contains("missing.deeper"));
    }

    #[test]
    fn test_get_through_scalar_intermediate_is_absent() {
        let mut tree = PathTree::new();
        tree.insert("a", Value::from("scalar"));
        assert_eq!(tree.get("a.b"), None);
        assert!(!tree.contains("a.b"));
    }

    #[test]
    fn test_insert_replaces_scalar_intermediate() {
        let mut tree = PathTree::new();
        tree.insert("a", Value::from("scalar"));
        tree.insert("a.b", Value::from("x"));
        assert_eq!(tree.get("a.b"), Some(&Value::from("x")));
        assert_eq!(tree.get("a").and_then(Value::as_scalar), None);
    }

    #[test]
    fn test_insert_overwrite_keeps_position() {
        let mut tree = PathTree::new();
        tree.insert("first", Value::from("1"));
        tree.insert("second", Value::from("2"));
        tree.insert("first", Value::from("updated"));
        assert_eq!(tree.block_keys(), vec!["first", "second"]);
    }

    #[test]
    fn test_remove_prunes_empty_ancestors() {
        // Scenario: insert then remove a deep leaf leaves nothing behind.
        let mut tree = PathTree::new();
        tree.insert("a.b.c", Value::from("x"));
        assert_eq!(tree.remove("a.b.c"), Some(Value::from("x")));
        assert!(tree.keys().is_empty());
        assert!(!tree.contains("a"));
    }

    #[test]
    fn test_remove_keeps_nonempty_ancestors() {
        let mut tree = PathTree::new();
        tree.insert("a.b.c", Value::from("x"));
        tree.insert("a.b.d", Value::from("y"));
        tree.remove("a.b.c");
        assert!(tree.contains("a.b.d"));
        assert_eq!(tree.keys(), vec!["a.b.d"]);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut tree = PathTree::new();
        tree.insert("a.b", Value::from("x"));
        assert!(tree.remove("a.b").is_some());
        assert!(tree.remove("a.b").is_none());
        assert!(tree.keys().is_empty());
    }

    #[test]
    fn test_keys_flatten_nested_maps() {
        let mut tree = PathTree::new();
        tree.insert("top", Value::from("1"));
        tree.insert("nested.inner.leaf", Value::from("2"));
        tree.insert("nested.other", Value::from("3"));
        assert_eq!(tree.keys(), vec!["top", "nested.inner.leaf", "nested.other"]);
    }

    #[test]
    fn test_keys_at_qualifies_with_path() {
        let mut tree = PathTree::new();
        tree.insert("nested.inner.leaf", Value::from("2"));
        tree.insert("nested.other", Value::from("3"));
        assert_eq!(tree.keys_at("nested"), vec!["nested.inner.leaf", "nested.other"]);
        assert!(tree.keys_at("missing").is_empty());
    }

    #[test]
    fn test_block_keys_are_shallow() {
        let mut tree = PathTree::new();
        tree.insert("a.b.c", Value::from("1"));
        tree.insert("d", Value::from("2"));
        assert_eq!(tree.block_keys(), vec!["a", "d"]);
        assert_eq!(tree.block_keys_at("a"), vec!["b"]);
    }

    #[test]
    fn test_len_counts_leaves() {
        let mut tree = PathTree::new();
        tree.insert("a.b.c", Value::from("1"));
        tree.insert("a.b.d", Value::from("2"));
        tree.insert("e", Value::List(vec![Value::from("x"), Value::from("y")]));
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.len_at("a"), 2);
        assert_eq!(tree.len_at("e"), 1);
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let mut tree = PathTree::new();
        tree.insert("Key", Value::from("1"));
        assert!(!tree.contains("key"));
        assert!(tree.contains("Key"));
    }

    #[test]
    fn test_invalid_path_is_noop() {
        let mut tree = PathTree::new();
        assert_eq!(tree.insert("a..b", Value::from("x")), None);
        assert!(tree.keys().is_empty());
        assert_eq!(tree.get(""), None);
        assert_eq!(tree.remove(".a"), None);
    }

    #[test]
    fn test_list_values_round_trip_through_tree() {
        let mut tree = PathTree::new();
        tree.insert("items", Value::from(vec!["1", "2"]));
        let items = tree.get("items").and_then(Value::as_list).unwrap();
        assert_eq!(items, &[Value::from("1"), Value::from("2")]);
    }
}
