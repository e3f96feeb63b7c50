//! Format codecs and adapters for configuration trees
//!
//! Decodes text in one of several formats into a [`conf_tree::PathTree`]
//! and encodes it back, preserving comments and blank-line layout where
//! the format supports it.

pub mod block;
pub mod comment;
pub mod error;
pub mod format;
pub mod handlers;

pub use block::BlockCodec;
pub use error::{Error, Result};
pub use format::{Format, FormatHandler};
pub use handlers::{BlockHandler, JsonHandler, TomlHandler, YamlHandler};
