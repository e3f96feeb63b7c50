//! The file-backed store facade

use crate::error::{Error, Result};
use crate::io;
use crate::reload::{ReloadGate, ReloadPolicy};
use conf_format::{Format, FormatHandler, comment};
use conf_tree::{PathTree, Value, parse_path};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// A configuration file held as an in-memory tree.
///
/// Reads consult the reload gate first; mutations re-encode the whole tree
/// and atomically overwrite the file. A per-instance mutex serializes
/// operations; nothing spans instances or processes, so two stores pointed
/// at the same file can overwrite each other's writes.
pub struct ConfigStore {
    path: PathBuf,
    handler: Box<dyn FormatHandler>,
    preserve_comments: bool,
    inner: Mutex<Inner>,
}

struct Inner {
    tree: PathTree,
    gate: ReloadGate,
}

impl std::fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigStore")
            .field("path", &self.path)
            .field("preserve_comments", &self.preserve_comments)
            .finish_non_exhaustive()
    }
}

impl ConfigStore {
    /// Open a store with the format chosen by file extension and the
    /// default `OnChange` reload policy.
    ///
    /// A missing file yields an empty tree; the file is created on the
    /// first write. A malformed file fails construction.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Self::open_with_policy(path, ReloadPolicy::default())
    }

    /// Open with an explicit reload policy.
    pub fn open_with_policy(path: impl Into<PathBuf>, policy: ReloadPolicy) -> Result<Self> {
        let path = path.into();
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_default();
        let format =
            Format::from_extension(&extension).ok_or(Error::UnsupportedFormat { extension })?;
        Self::with_handler(path, format.handler(), policy)
    }

    /// Open with an injected handler instead of extension detection.
    pub fn with_handler(
        path: impl Into<PathBuf>,
        handler: Box<dyn FormatHandler>,
        policy: ReloadPolicy,
    ) -> Result<Self> {
        let path = path.into();
        let tree = if path.exists() {
            let source = io::read_text(&path)?;
            handler.decode(&source)?
        } else {
            PathTree::new()
        };
        tracing::debug!(
            path = %path.display(),
            format = ?handler.format(),
            leaves = tree.len(),
            "opened config store"
        );

        let mut gate = ReloadGate::new(policy);
        gate.mark_synced();
        Ok(Self {
            preserve_comments: handler.preserves_comments(),
            path,
            handler,
            inner: Mutex::new(Inner { tree, gate }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> Format {
        self.handler.format()
    }

    /// Value at a dotted path, `None` when absent.
    pub fn get(&self, path: &str) -> Result<Option<Value>> {
        let mut inner = self.lock();
        self.refresh(&mut inner)?;
        Ok(inner.tree.get(path).cloned())
    }

    /// Scalar text at a dotted path, `None` when absent or not a scalar.
    pub fn get_str(&self, path: &str) -> Result<Option<String>> {
        let mut inner = self.lock();
        self.refresh(&mut inner)?;
        Ok(inner
            .tree
            .get(path)
            .and_then(Value::as_scalar)
            .map(str::to_string))
    }

    pub fn contains(&self, path: &str) -> Result<bool> {
        let mut inner = self.lock();
        self.refresh(&mut inner)?;
        Ok(inner.tree.contains(path))
    }

    /// Fully-qualified dotted keys of all leaves.
    pub fn keys(&self) -> Result<Vec<String>> {
        let mut inner = self.lock();
        self.refresh(&mut inner)?;
        Ok(inner.tree.keys())
    }

    /// Fully-qualified dotted keys of all leaves at or under `path`.
    pub fn keys_at(&self, path: &str) -> Result<Vec<String>> {
        let mut inner = self.lock();
        self.refresh(&mut inner)?;
        Ok(inner.tree.keys_at(path))
    }

    /// Immediate child names of the root.
    pub fn block_keys(&self) -> Result<Vec<String>> {
        let mut inner = self.lock();
        self.refresh(&mut inner)?;
        Ok(inner.tree.block_keys())
    }

    /// Immediate child names under `path`.
    pub fn block_keys_at(&self, path: &str) -> Result<Vec<String>> {
        let mut inner = self.lock();
        self.refresh(&mut inner)?;
        Ok(inner.tree.block_keys_at(path))
    }

    /// Count of leaves in the tree.
    pub fn len(&self) -> Result<usize> {
        let mut inner = self.lock();
        self.refresh(&mut inner)?;
        Ok(inner.tree.len())
    }

    /// Insert a value and persist the tree.
    ///
    /// Intermediate maps are created as needed; a non-map intermediate is
    /// replaced with a fresh map, discarding its old value.
    pub fn set(&self, path: &str, value: impl Into<Value>) -> Result<()> {
        if parse_path(path).is_none() {
            return Err(Error::InvalidPath {
                path: path.to_string(),
            });
        }
        let mut inner = self.lock();
        self.refresh(&mut inner)?;
        inner.tree.insert(path, value.into());
        self.write(&mut inner)
    }

    /// Remove the value at a path and persist the tree.
    ///
    /// Removing an absent path changes nothing on disk.
    pub fn remove(&self, path: &str) -> Result<()> {
        if parse_path(path).is_none() {
            return Err(Error::InvalidPath {
                path: path.to_string(),
            });
        }
        let mut inner = self.lock();
        self.refresh(&mut inner)?;
        if inner.tree.remove(path).is_none() {
            return Ok(());
        }
        self.write(&mut inner)
    }

    /// Header comment lines of the root.
    pub fn header(&self) -> Result<Vec<String>> {
        let mut inner = self.lock();
        self.refresh(&mut inner)?;
        Ok(comment::header(&inner.tree, None))
    }

    /// Header comment lines of the block at `path`.
    pub fn header_at(&self, path: &str) -> Result<Vec<String>> {
        let mut inner = self.lock();
        self.refresh(&mut inner)?;
        Ok(comment::header(&inner.tree, Some(path)))
    }

    /// Footer comment lines of the root.
    pub fn footer(&self) -> Result<Vec<String>> {
        let mut inner = self.lock();
        self.refresh(&mut inner)?;
        Ok(comment::footer(&inner.tree, None))
    }

    pub fn footer_at(&self, path: &str) -> Result<Vec<String>> {
        let mut inner = self.lock();
        self.refresh(&mut inner)?;
        Ok(comment::footer(&inner.tree, Some(path)))
    }

    /// Replace the root header and persist. No-op when the backing format
    /// does not preserve comments.
    pub fn set_header(&self, lines: &[&str]) -> Result<()> {
        self.set_comment_run(None, lines, comment::set_header)
    }

    /// Replace the header of the block at `path` and persist.
    pub fn set_header_at(&self, path: &str, lines: &[&str]) -> Result<()> {
        self.set_comment_run(Some(path), lines, comment::set_header)
    }

    /// Replace the root footer and persist.
    pub fn set_footer(&self, lines: &[&str]) -> Result<()> {
        self.set_comment_run(None, lines, comment::set_footer)
    }

    pub fn set_footer_at(&self, path: &str, lines: &[&str]) -> Result<()> {
        self.set_comment_run(Some(path), lines, comment::set_footer)
    }

    /// Force a re-decode from disk regardless of policy.
    ///
    /// On failure the previous tree is retained and the error surfaced.
    pub fn reload(&self) -> Result<()> {
        let mut inner = self.lock();
        self.decode_from_disk(&mut inner)
    }

    /// Persist the current tree without changing it.
    pub fn save(&self) -> Result<()> {
        let mut inner = self.lock();
        self.write(&mut inner)
    }

    fn set_comment_run(
        &self,
        path: Option<&str>,
        lines: &[&str],
        apply: fn(&mut PathTree, Option<&str>, &[&str]),
    ) -> Result<()> {
        if !self.preserve_comments {
            return Ok(());
        }
        let mut inner = self.lock();
        self.refresh(&mut inner)?;
        apply(&mut inner.tree, path, lines);
        self.write(&mut inner)
    }

    /// Re-decode from disk when the gate says the tree is stale.
    fn refresh(&self, inner: &mut Inner) -> Result<()> {
        if !inner.gate.is_stale(io::modified_time(&self.path)) {
            return Ok(());
        }
        if !self.path.exists() {
            // Nothing on disk yet; the in-memory tree stays authoritative.
            return Ok(());
        }
        self.decode_from_disk(inner)
    }

    fn decode_from_disk(&self, inner: &mut Inner) -> Result<()> {
        let source = std::fs::read_to_string(&self.path).map_err(|e| {
            tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "reload required but file is unreadable; keeping cached tree"
            );
            Error::StaleRead {
                path: self.path.clone(),
                source: e,
            }
        })?;
        let tree = self.handler.decode(&source)?;
        inner.tree = tree;
        inner.gate.mark_synced();
        tracing::debug!(path = %self.path.display(), leaves = inner.tree.len(), "reloaded config");
        Ok(())
    }

    fn write(&self, inner: &mut Inner) -> Result<()> {
        let text = self.handler.encode(&inner.tree, self.preserve_comments)?;
        io::write_atomic(&self.path, text.as_bytes())?;
        inner.gate.mark_synced();
        tracing::debug!(path = %self.path.display(), bytes = text.len(), "wrote config");
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
