//! # Snapshot capture configuration.
//!
//! [`SnapshotConfig`] defines where capture actions store their artifacts,
//! how many of them the pruning pass retains, and the file extension that
//! artifact names carry.
//!
//! # Example
//! ```
//! use gatehouse::{RetentionPolicy, SnapshotConfig};
//!
//! let mut cfg = SnapshotConfig::default();
//! cfg.path = "/var/lib/gatehouse/snapshots".into();
//! cfg.keep = 10;
//!
//! assert_eq!(cfg.retention(), RetentionPolicy::Keep(10));
//! assert_eq!(cfg.extension, "jpg");
//! ```

use std::path::PathBuf;

use crate::error::ConfigError;
use crate::retention::{ArtifactDir, LastArtifact, RetentionPolicy};

/// Settings for snapshot capture and retention.
///
/// Controls the artifact directory and how aggressively old artifacts are
/// pruned after each successful capture.
#[derive(Clone, Debug)]
pub struct SnapshotConfig {
    /// Base directory for captured artifacts (empty = unconfigured; rejected when resolved).
    pub path: PathBuf,
    /// Number of newest artifacts to keep after a capture (0 or negative = keep everything).
    pub keep: i64,
    /// Artifact file extension without the leading dot.
    pub extension: String,
}

impl Default for SnapshotConfig {
    /// Provides a default configuration:
    /// - `path = ""` (unconfigured; must be set before resolving)
    /// - `keep = 10`
    /// - `extension = "jpg"`
    fn default() -> Self {
        Self {
            path: PathBuf::new(),
            keep: 10,
            extension: "jpg".to_string(),
        }
    }
}

impl SnapshotConfig {
    /// Returns the retention policy derived from [`keep`](Self::keep).
    #[inline]
    pub fn retention(&self) -> RetentionPolicy {
        RetentionPolicy::from_keep(self.keep)
    }

    /// Resolves the configured path into a usable [`ArtifactDir`] recording
    /// into `slot`.
    ///
    /// Fails with [`ConfigError::EmptyPath`] when [`path`](Self::path) was
    /// never set.
    pub fn resolve(&self, slot: LastArtifact) -> Result<ArtifactDir, ConfigError> {
        ArtifactDir::resolve(self.path.clone(), self.extension.clone(), slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unconfigured_but_keeps_ten() {
        let cfg = SnapshotConfig::default();
        assert!(cfg.path.as_os_str().is_empty());
        assert_eq!(cfg.retention(), RetentionPolicy::Keep(10));
        assert_eq!(cfg.extension, "jpg");
    }

    #[test]
    fn test_resolve_rejects_the_unset_path() {
        let err = SnapshotConfig::default()
            .resolve(LastArtifact::new())
            .expect_err("unset path must be rejected");
        assert!(matches!(err, ConfigError::EmptyPath));
    }

    #[test]
    fn test_resolve_wires_path_and_extension_through() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = SnapshotConfig {
            path: tmp.path().to_path_buf(),
            keep: -1,
            extension: "png".to_string(),
        };

        let dir = cfg.resolve(LastArtifact::new()).unwrap();
        assert_eq!(dir.base(), tmp.path());
        assert_eq!(cfg.retention(), RetentionPolicy::Unlimited);

        let path = dir.next_path().unwrap();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("png"));
    }
}
