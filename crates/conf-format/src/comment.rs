//! Header and footer comment handling
//!
//! A header is the contiguous run of comment entries at the very start of
//! a map; a footer is the run at its very end. Shared by the block codec
//! and by comment-preserving adapters for other formats.

use conf_tree::{Map, PathTree, Value};

/// Header comment lines of the root (or of the map at `path`), in
/// top-to-bottom order. Empty when the path is absent or not a map.
pub fn header(tree: &PathTree, path: Option<&str>) -> Vec<String> {
    let Some(map) = target(tree, path) else {
        return Vec::new();
    };
    map.entries()
        .iter()
        .map_while(|(_, value)| match value {
            Value::Comment(text) => Some(text.clone()),
            _ => None,
        })
        .collect()
}

/// Footer comment lines of the root (or of the map at `path`), in
/// top-to-bottom order.
pub fn footer(tree: &PathTree, path: Option<&str>) -> Vec<String> {
    let Some(map) = target(tree, path) else {
        return Vec::new();
    };
    let mut lines: Vec<String> = map
        .entries()
        .iter()
        .rev()
        .map_while(|(_, value)| match value {
            Value::Comment(text) => Some(text.clone()),
            _ => None,
        })
        .collect();
    lines.reverse();
    lines
}

/// Replace the header comment run of the root (or of the map at `path`).
///
/// Lines lacking a leading `#` get one. Calling twice with the same input
/// leaves the tree unchanged the second time. No-op on an absent or
/// non-map path.
pub fn set_header(tree: &mut PathTree, path: Option<&str>, lines: &[&str]) {
    let Some(map) = target_mut(tree, path) else {
        return;
    };
    while matches!(map.entries().first(), Some((_, Value::Comment(_)))) {
        map.remove_at(0);
    }
    for line in lines.iter().rev() {
        map.insert_marker_at(0, Value::Comment(prefixed(line)));
    }
}

/// Replace the footer comment run of the root (or of the map at `path`).
pub fn set_footer(tree: &mut PathTree, path: Option<&str>, lines: &[&str]) {
    let Some(map) = target_mut(tree, path) else {
        return;
    };
    while matches!(map.entries().last(), Some((_, Value::Comment(_)))) {
        map.remove_at(map.entries().len() - 1);
    }
    for line in lines {
        map.push_comment(prefixed(line));
    }
}

fn prefixed(line: &str) -> String {
    if line.starts_with('#') {
        line.to_string()
    } else {
        format!("#{line}")
    }
}

fn target<'t>(tree: &'t PathTree, path: Option<&str>) -> Option<&'t Map> {
    match path {
        None => Some(tree.root()),
        Some(p) => tree.get(p).and_then(Value::as_map),
    }
}

fn target_mut<'t>(tree: &'t mut PathTree, path: Option<&str>) -> Option<&'t mut Map> {
    match path {
        None => Some(tree.root_mut()),
        Some(p) => match tree.get_mut(p) {
            Some(Value::Map(map)) => Some(map),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockCodec;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_header_stops_at_first_non_comment() {
        let tree = BlockCodec::decode("#one\n#two\nkey = 1\n#not-header\n").unwrap();
        assert_eq!(header(&tree, None), vec!["#one", "#two"]);
    }

    #[test]
    fn test_header_stops_at_blank_line() {
        let tree = BlockCodec::decode("#one\n\n#after-blank\nkey = 1\n").unwrap();
        assert_eq!(header(&tree, None), vec!["#one"]);
    }

    #[test]
    fn test_footer_in_original_order() {
        let tree = BlockCodec::decode("key = 1\n#first\n#second\n").unwrap();
        assert_eq!(footer(&tree, None), vec!["#first", "#second"]);
    }

    #[test]
    fn test_header_of_nested_block() {
        let tree = BlockCodec::decode("key1 {\n  #comment\n  sub = 5\n}\n").unwrap();
        assert_eq!(header(&tree, Some("key1")), vec!["#comment"]);
        assert_eq!(tree.get("key1.sub"), Some(&Value::from("5")));
    }

    #[test]
    fn test_set_header_auto_prefixes() {
        let mut tree = BlockCodec::decode("key = 1\n").unwrap();
        set_header(&mut tree, None, &["plain", "#tagged"]);
        assert_eq!(header(&tree, None), vec!["#plain", "#tagged"]);
    }

    #[test]
    fn test_set_header_replaces_existing_run() {
        let mut tree = BlockCodec::decode("#old\n#stale\nkey = 1\n").unwrap();
        set_header(&mut tree, None, &["#new"]);
        assert_eq!(header(&tree, None), vec!["#new"]);
        assert_eq!(tree.get("key"), Some(&Value::from("1")));
    }

    #[test]
    fn test_set_header_idempotent_on_disk() {
        let mut tree = BlockCodec::decode("key = 1\n").unwrap();
        set_header(&mut tree, None, &["#h1", "#h2"]);
        let first = BlockCodec::encode(&tree, true);
        set_header(&mut tree, None, &["#h1", "#h2"]);
        let second = BlockCodec::encode(&tree, true);
        assert_eq!(first, second);
    }

    #[test]
    fn test_set_footer_replaces_trailing_run() {
        let mut tree = BlockCodec::decode("key = 1\n#old\n").unwrap();
        set_footer(&mut tree, None, &["fresh"]);
        assert_eq!(footer(&tree, None), vec!["#fresh"]);
        assert_eq!(BlockCodec::encode(&tree, true), "key = 1\n#fresh\n");
    }

    #[test]
    fn test_set_header_on_absent_path_is_noop() {
        let mut tree = BlockCodec::decode("key = 1\n").unwrap();
        set_header(&mut tree, Some("missing"), &["#h"]);
        assert_eq!(BlockCodec::encode(&tree, true), "key = 1\n");
    }

    #[test]
    fn test_header_round_trips_through_codec() {
        let mut tree = BlockCodec::decode("key = 1\n").unwrap();
        set_header(&mut tree, None, &["top", "#second"]);
        let reparsed = BlockCodec::decode(&BlockCodec::encode(&tree, true)).unwrap();
        assert_eq!(header(&reparsed, None), vec!["#top", "#second"]);
    }
}
