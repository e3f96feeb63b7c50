//! File-backed configuration store
//!
//! Ties a format handler to a file on disk: decodes it into a
//! [`conf_tree::PathTree`], answers dotted-path reads through a reload
//! gate, and writes every mutation back as an atomic whole-file overwrite.

pub mod error;
pub mod io;
pub mod reload;
pub mod store;

pub use error::{Error, Result};
pub use reload::{ReloadGate, ReloadPolicy};
pub use store::ConfigStore;
