//! Reload policy gate
//!
//! Decides whether a store's in-memory tree must be refreshed from disk
//! before an access.

use std::time::SystemTime;

/// When a backing store re-decodes its file before a read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReloadPolicy {
    /// Every access re-decodes from disk
    Always,
    /// Re-decode when the file's mtime moved past the last sync
    #[default]
    OnChange,
    /// Only explicit reload calls re-decode
    Never,
}

/// Tracks the timestamp of the last successful decode or write and applies
/// a [`ReloadPolicy`] against the file's current mtime.
#[derive(Debug)]
pub struct ReloadGate {
    policy: ReloadPolicy,
    last_sync: Option<SystemTime>,
}

impl ReloadGate {
    pub fn new(policy: ReloadPolicy) -> Self {
        Self {
            policy,
            last_sync: None,
        }
    }

    pub fn policy(&self) -> ReloadPolicy {
        self.policy
    }

    /// Whether the backing file must be decoded again before answering.
    ///
    /// A missing file (`mtime == None`) is never stale under `OnChange`;
    /// there is nothing newer on disk to load.
    pub fn is_stale(&self, mtime: Option<SystemTime>) -> bool {
        match self.policy {
            ReloadPolicy::Always => true,
            ReloadPolicy::Never => false,
            ReloadPolicy::OnChange => match (self.last_sync, mtime) {
                (Some(sync), Some(mtime)) => mtime > sync,
                (None, Some(_)) => true,
                (_, None) => false,
            },
        }
    }

    /// Record a successful decode or write.
    pub fn mark_synced(&mut self) {
        self.last_sync = Some(SystemTime::now());
    }

    pub fn last_sync(&self) -> Option<SystemTime> {
        self.last_sync
    }
}
