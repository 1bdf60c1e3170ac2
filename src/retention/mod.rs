//! Retention-managed storage for capture artifacts.
//!
//! Capture actions allocate timestamp-named paths, write into them, then
//! prune whatever the retention policy no longer covers. The directory is
//! the single source of truth; nothing here caches listings or tracks
//! files between calls.
//!
//! Modules:
//! - [`policy`](self): [`RetentionPolicy`] — how many artifacts survive a prune;
//! - [`dir`](self): [`ArtifactDir`] — path allocation, listing, pruning;
//! - [`slot`](self): [`LastArtifact`] — shared handle to the newest path.

mod dir;
mod policy;
mod slot;

pub use dir::ArtifactDir;
pub use policy::RetentionPolicy;
pub use slot::LastArtifact;
