//! Handler for the native block text format

use crate::block::BlockCodec;
use crate::error::Result;
use crate::format::{Format, FormatHandler};
use conf_tree::PathTree;

/// Handler wrapping [`BlockCodec`]
#[derive(Debug, Default)]
pub struct BlockHandler;

impl BlockHandler {
    pub fn new() -> Self {
        Self
    }
}

impl FormatHandler for BlockHandler {
    fn format(&self) -> Format {
        Format::Block
    }

    fn decode(&self, source: &str) -> Result<PathTree> {
        BlockCodec::decode(source)
    }

    fn encode(&self, tree: &PathTree, preserve_comments: bool) -> Result<String> {
        Ok(BlockCodec::encode(tree, preserve_comments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conf_tree::Value;

    #[test]
    fn test_block_handler_round_trip() {
        let handler = BlockHandler::new();
        let tree = handler.decode("#note\nkey = value\n").unwrap();
        assert_eq!(tree.get("key"), Some(&Value::from("value")));
        let text = handler.encode(&tree, true).unwrap();
        assert_eq!(text, "#note\nkey = value\n");
    }

    #[test]
    fn test_block_handler_preserves_comments() {
        assert!(BlockHandler::new().preserves_comments());
    }
}
