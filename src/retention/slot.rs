//! # Shared slot holding the most recent artifact path.
//!
//! [`LastArtifact`] replaces a writable "last snapshot" config key with an
//! explicit handle. Capture actions record into it after every successful
//! write; status surfaces read from it whenever they like.
//!
//! ## Architecture
//! ```text
//!  capture action ── record(path) ──► LastArtifact (Option<PathBuf> behind RwLock)
//!                                          │
//!  status surface ◄──── get() ─────────────┘
//! ```
//!
//! ## Rules
//! - One writer per capture call; concurrent captures race and the
//!   last write wins, matching the retention directory itself.
//! - A fresh slot reads as [`None`] until the first path is allocated.
//! - Recording happens at allocation time, so the slot can briefly point
//!   at an artifact that is still being written.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;

/// Cloneable handle to the most recently captured artifact path.
///
/// All clones share the same slot. Reads return an owned copy so callers
/// never hold the lock across their own work.
#[derive(Clone, Debug)]
pub struct LastArtifact {
    inner: Arc<RwLock<Option<PathBuf>>>,
}

impl LastArtifact {
    /// Creates a new, empty slot.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(None)),
        }
    }

    /// Records `path` as the most recent artifact, replacing any previous value.
    pub fn record(&self, path: impl Into<PathBuf>) {
        *self.inner.write() = Some(path.into());
    }

    /// Returns a copy of the most recent artifact path, if any capture
    /// has succeeded since the slot was created.
    pub fn get(&self) -> Option<PathBuf> {
        self.inner.read().clone()
    }
}

impl Default for LastArtifact {
    fn default() -> Self {
        Self::new()
    }
}
