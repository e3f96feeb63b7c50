//! Format detection and the handler trait

use crate::error::Result;
use crate::handlers::{BlockHandler, JsonHandler, TomlHandler, YamlHandler};
use conf_tree::PathTree;

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// The brace-delimited block text format (`.ls`)
    Block,
    Yaml,
    Json,
    Toml,
}

impl Format {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "ls" => Some(Self::Block),
            "yml" | "yaml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }

    /// Default file extensions for this format
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Block => &["ls"],
            Self::Yaml => &["yml", "yaml"],
            Self::Json => &["json"],
            Self::Toml => &["toml"],
        }
    }

    /// Whether comments survive a read-modify-write cycle in this format.
    ///
    /// The block codec preserves comments and blank lines positionally;
    /// the YAML adapter preserves header and footer comment lines only.
    pub fn preserves_comments(&self) -> bool {
        matches!(self, Self::Block | Self::Yaml)
    }

    /// Build the handler for this format
    pub fn handler(&self) -> Box<dyn FormatHandler> {
        match self {
            Self::Block => Box::new(BlockHandler::new()),
            Self::Yaml => Box::new(YamlHandler::new()),
            Self::Json => Box::new(JsonHandler::new()),
            Self::Toml => Box::new(TomlHandler::new()),
        }
    }
}

/// Trait for format-specific codecs over a [`PathTree`]
pub trait FormatHandler: Send + Sync {
    /// Format identifier
    fn format(&self) -> Format;

    /// Decode source text into a tree.
    ///
    /// A decode error aborts the whole operation; no partially-built tree
    /// is ever returned.
    fn decode(&self, source: &str) -> Result<PathTree>;

    /// Encode a tree back to text.
    ///
    /// `preserve_comments` selects whether layout markers held in the tree
    /// are emitted; formats without comment support ignore it.
    fn encode(&self, tree: &PathTree, preserve_comments: bool) -> Result<String>;

    /// Whether this handler carries comments through decode/encode
    fn preserves_comments(&self) -> bool {
        self.format().preserves_comments()
    }
}
