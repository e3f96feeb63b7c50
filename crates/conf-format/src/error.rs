//! Error types for conf-format

/// Result type for conf-format operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while decoding or encoding configuration text
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("line {line}: closing brace without an open block")]
    UnexpectedClose { line: usize },

    #[error("block '{key}' opened at line {line} is never closed")]
    UnterminatedBlock { key: String, line: usize },

    #[error("list '{key}' opened at line {line} is never closed")]
    UnterminatedList { key: String, line: usize },

    #[error("line {line}: key '{key}' has no value and opens no block")]
    MissingValue { key: String, line: usize },

    #[error("failed to parse {format} content: {message}")]
    Parse { format: String, message: String },

    #[error("failed to serialize {format} content: {message}")]
    Serialize { format: String, message: String },
}

impl Error {
    pub fn parse(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            format: format.into(),
            message: message.into(),
        }
    }

    pub fn serialize(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Serialize {
            format: format.into(),
            message: message.into(),
        }
    }
}
