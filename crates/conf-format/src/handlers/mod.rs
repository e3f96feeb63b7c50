//! Format handlers

mod block;
mod json;
mod toml;
mod yaml;

pub use self::block::BlockHandler;
pub use self::json::JsonHandler;
pub use self::toml::TomlHandler;
pub use self::yaml::YamlHandler;
