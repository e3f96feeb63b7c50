//! Codec for the brace-delimited block text format
//!
//! Line-oriented grammar; indentation is cosmetic, braces are structural:
//!
//! ```text
//! key {            opens a nested block, closed by a line "}"
//! key = value      scalar declaration
//! key = [          list declaration, one "- value" per line, closed by "]"
//! #comment         comment line, kept positionally
//!                  blank line, kept positionally
//! ```
//!
//! Comments and blank lines decode into layout-marker entries of the
//! enclosing map so they keep their position among real keys and survive a
//! read-modify-write cycle.

use crate::error::{Error, Result};
use conf_tree::{Map, PathTree, Value};
use std::collections::VecDeque;

/// Encoder/decoder for the block text format
pub struct BlockCodec;

impl BlockCodec {
    /// Decode block-format text into a tree.
    pub fn decode(source: &str) -> Result<PathTree> {
        let mut queue = LineQueue::new(source);
        let mut root = Map::new();
        decode_block(&mut queue, &mut root, None)?;
        Ok(PathTree::from_root(root))
    }

    /// Encode a tree as block-format text.
    ///
    /// With `preserve_comments`, layout markers held in the tree are
    /// emitted in place; without, they are filtered before traversal.
    pub fn encode(tree: &PathTree, preserve_comments: bool) -> String {
        let mut out = String::new();
        encode_map(tree.root(), 0, preserve_comments, &mut out);
        out
    }
}

/// Mutable queue of source lines, tracking the 1-based number of the last
/// line handed out.
struct LineQueue<'a> {
    lines: VecDeque<&'a str>,
    consumed: usize,
}

impl<'a> LineQueue<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            lines: source.lines().collect(),
            consumed: 0,
        }
    }

    fn pop(&mut self) -> Option<&'a str> {
        let line = self.lines.pop_front()?;
        self.consumed += 1;
        Some(line)
    }

    fn peek(&self) -> Option<&'a str> {
        self.lines.front().copied()
    }

    fn line(&self) -> usize {
        self.consumed
    }
}

/// Consume lines into `map` until the matching `}` (or end of input at top
/// level). `open` names the enclosing block, `None` at top level.
fn decode_block(queue: &mut LineQueue, map: &mut Map, open: Option<(&str, usize)>) -> Result<()> {
    while let Some(raw) = queue.pop() {
        let line = queue.line();
        let text = raw.trim();

        if text.is_empty() {
            map.push_blank();
            continue;
        }
        if text.starts_with('#') {
            map.push_comment(text);
            continue;
        }
        if text == "}" {
            return match open {
                Some(_) => Ok(()),
                None => Err(Error::UnexpectedClose { line }),
            };
        }

        if let Some(eq) = text.find('=') {
            let key = text[..eq].trim_end();
            let value = text[eq + 1..].trim();
            if key.is_empty() {
                return Err(Error::MissingValue {
                    key: text.to_string(),
                    line,
                });
            }
            if value == "[" {
                let items = decode_list(queue, key, line)?;
                map.insert(key, Value::List(items));
            } else {
                map.insert(key, Value::Scalar(value.to_string()));
            }
            continue;
        }

        if let Some(key) = text.strip_suffix('{') {
            let key = key.trim_end();
            if key.is_empty() {
                return Err(Error::MissingValue {
                    key: text.to_string(),
                    line,
                });
            }
            let mut child = Map::new();
            decode_block(queue, &mut child, Some((key, line)))?;
            map.insert(key, Value::Map(child));
            continue;
        }

        // Bare key: accepted only when the next line opens its block.
        if queue.peek().map(str::trim) == Some("{") {
            queue.pop();
            let mut child = Map::new();
            decode_block(queue, &mut child, Some((text, line)))?;
            map.insert(text, Value::Map(child));
            continue;
        }

        return Err(Error::MissingValue {
            key: text.to_string(),
            line,
        });
    }

    match open {
        Some((key, line)) => Err(Error::UnterminatedBlock {
            key: key.to_string(),
            line,
        }),
        None => Ok(()),
    }
}

fn decode_list(queue: &mut LineQueue, key: &str, line: usize) -> Result<Vec<Value>> {
    let mut items = Vec::new();
    while let Some(raw) = queue.pop() {
        let text = raw.trim();
        if text == "]" {
            return Ok(items);
        }
        let item = text.strip_prefix('-').map_or(text, str::trim_start);
        items.push(Value::Scalar(item.to_string()));
    }
    Err(Error::UnterminatedList {
        key: key.to_string(),
        line,
    })
}

fn encode_map(map: &Map, depth: usize, preserve_comments: bool, out: &mut String) {
    let indent = "  ".repeat(depth);
    for (key, value) in map.entries() {
        match value {
            Value::Comment(text) => {
                if preserve_comments {
                    out.push_str(&indent);
                    out.push_str(text);
                    out.push('\n');
                }
            }
            Value::Blank => {
                if preserve_comments {
                    out.push('\n');
                }
            }
            Value::Map(child) => {
                out.push_str(&format!("{indent}{key} {{\n"));
                encode_map(child, depth + 1, preserve_comments, out);
                out.push_str(&format!("{indent}}}\n"));
            }
            Value::List(items) => {
                out.push_str(&format!("{indent}{key} = [\n"));
                for item in items {
                    // The block grammar only carries scalar elements.
                    if let Value::Scalar(text) = item {
                        out.push_str(&format!("{indent}  - {text}\n"));
                    }
                }
                out.push_str(&format!("{indent}]\n"));
            }
            Value::Scalar(text) => {
                out.push_str(&format!("{indent}{key} = {text}\n"));
            }
        }
    }
}
