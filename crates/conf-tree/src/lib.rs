//! Nested key-path tree for configuration data
//!
//! Provides the insertion-ordered tree that every format adapter reads and
//! writes, addressed by dot-separated paths like `config.database.host`.

pub mod path;
pub mod tree;
pub mod value;

pub use path::parse_path;
pub use tree::PathTree;
pub use value::{Map, Value};
