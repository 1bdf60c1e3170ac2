//! # Retention-managed artifact directory.
//!
//! [`ArtifactDir`] owns one flat directory of timestamp-named files and the
//! three operations every capture action performs against it: allocate the
//! next path, list what exists, prune the surplus.
//!
//! ## Architecture
//! ```text
//!  capture action ── next_path() ──► base/2026-08-21_14-03-59.jpg
//!        │                                │
//!        │                                └──► LastArtifact::record
//!        │
//!        ├── list_all() ──► [oldest .. newest]   (ascending by name)
//!        │
//!        └── prune(policy) ──► delete oldest surplus, collect failures
//! ```
//!
//! ## Rules
//! - Names are second-resolution local timestamps, so lexicographic name
//!   order equals capture-time order and pruning never needs mtimes.
//! - Two allocations within the same second yield the same path; the later
//!   write overwrites the earlier one, like the last-artifact slot itself.
//! - Every operation re-ensures the base directory, so an externally
//!   deleted base is recreated before use.
//! - Listings are computed fresh per call; nothing is cached between
//!   operations.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{debug, warn};

use crate::error::{CleanupError, ConfigError};
use crate::retention::{LastArtifact, RetentionPolicy};

/// Timestamp layout for artifact file names. Second resolution, zero-padded,
/// big-endian fields, so name order equals time order.
const STAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// A flat directory of timestamp-named artifact files.
///
/// Cheap to clone; clones share the same [`LastArtifact`] slot and operate
/// on the same base directory.
#[derive(Clone, Debug)]
pub struct ArtifactDir {
    base: PathBuf,
    ext: String,
    slot: LastArtifact,
}

impl ArtifactDir {
    /// Resolves `path` into a usable artifact directory.
    ///
    /// Fails with [`ConfigError::EmptyPath`] when `path` is empty (nothing
    /// is created in that case), otherwise creates the directory and any
    /// missing parents. Creation is idempotent and safe under concurrent
    /// resolution of the same path.
    ///
    /// `ext` is the artifact file extension without the leading dot.
    /// Allocated paths are recorded into `slot`.
    pub fn resolve(
        path: impl Into<PathBuf>,
        ext: impl Into<String>,
        slot: LastArtifact,
    ) -> Result<Self, ConfigError> {
        let base = path.into();
        if base.as_os_str().is_empty() {
            return Err(ConfigError::EmptyPath);
        }
        let dir = Self {
            base,
            ext: ext.into(),
            slot,
        };
        dir.ensure().map_err(|source| ConfigError::CreateDir {
            path: dir.base.clone(),
            source,
        })?;
        Ok(dir)
    }

    /// The resolved base directory.
    #[inline]
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// The shared slot that tracks the most recently allocated path.
    #[inline]
    pub fn slot(&self) -> &LastArtifact {
        &self.slot
    }

    /// Allocates the path for the next artifact and records it into the
    /// shared slot.
    ///
    /// The name is the current local time at second resolution; a second
    /// allocation within the same second returns the same path and the
    /// later write wins.
    pub fn next_path(&self) -> io::Result<PathBuf> {
        self.ensure()?;
        let stamp = Local::now().format(STAMP_FORMAT);
        let path = self.base.join(format!("{stamp}.{}", self.ext));
        self.slot.record(&path);
        Ok(path)
    }

    /// Returns the regular files directly under the base, ascending by
    /// name (oldest first). Subdirectories and their contents are ignored.
    pub fn list_all(&self) -> io::Result<Vec<PathBuf>> {
        self.ensure()?;
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.base)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                files.push(entry.path());
            }
        }
        files.sort();
        Ok(files)
    }

    /// Deletes every artifact beyond what `policy` retains, oldest first.
    ///
    /// A deletion failure is logged and collected, never short-circuiting
    /// the remaining candidates; the complete failure list is returned.
    /// Errs only when the directory itself cannot be listed. No-op under
    /// [`RetentionPolicy::Unlimited`] or when the listing is already at or
    /// below the keep count.
    pub fn prune(&self, policy: RetentionPolicy) -> io::Result<Vec<CleanupError>> {
        let files = self.list_all()?;
        let excess = policy.excess(files.len());
        if excess == 0 {
            return Ok(Vec::new());
        }

        let mut removed = 0usize;
        let mut failures = Vec::new();
        for path in files.into_iter().take(excess) {
            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(source) => {
                    warn!(file = %path.display(), error = %source, "failed to delete expired artifact");
                    failures.push(CleanupError { path, source });
                }
            }
        }
        debug!(removed, failed = failures.len(), dir = %self.base.display(), "pruned artifact directory");
        Ok(failures)
    }

    /// Recreates the base directory if something removed it since resolve.
    fn ensure(&self) -> io::Result<()> {
        fs::create_dir_all(&self.base)
    }
}
