//! Error types used by the event core and the retention directory.
//!
//! The taxonomy scopes every failure to the smallest unit of work — one
//! handler, one file, one capture:
//!
//! - [`ConfigError`] — missing or invalid settings; fatal to the operation
//!   that required them.
//! - [`CaptureError`] — an external capture capability failed; the capture
//!   action aborts and skips retention.
//! - [`CleanupError`] — a single file could not be deleted during pruning;
//!   collected per file, never aborts the batch.
//! - [`HandlerError`] — an event handler failed during dispatch; caught at
//!   the dispatch boundary, sibling handlers unaffected.
//! - [`ActionError`] — umbrella for action execution failures.
//! - [`SubmitError`] — the owner thread is no longer accepting jobs.
//!
//! No failure escapes a dispatch boundary: `fire` and `fire_sync` never
//! surface handler failures to the firing caller.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// # Errors caused by missing or invalid configuration.
///
/// Raised while resolving settings or constructing actions, before any
/// dispatch begins. Factories probe their capabilities up front, so an
/// unusable action fails here instead of on its first invocation.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The retention base path was empty or unset.
    #[error("snapshot path must not be empty")]
    EmptyPath,

    /// No factory is registered under the given action identifier.
    #[error("unknown action '{0}'")]
    UnknownAction(String),

    /// A factory rejected its argument string or a capability probe failed.
    #[error("action '{id}': {reason}")]
    InvalidArgs {
        /// Identifier of the rejecting factory.
        id: String,
        /// Why the arguments (or the probed capability) were rejected.
        reason: String,
    },

    /// The retention base directory could not be created.
    #[error("creating {}: {source}", path.display())]
    CreateDir {
        /// The directory that could not be created.
        path: PathBuf,
        /// Underlying filesystem error.
        #[source]
        source: io::Error,
    },
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use gatehouse::ConfigError;
    ///
    /// assert_eq!(ConfigError::EmptyPath.as_label(), "config_empty_path");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::EmptyPath => "config_empty_path",
            ConfigError::UnknownAction(_) => "config_unknown_action",
            ConfigError::InvalidArgs { .. } => "config_invalid_args",
            ConfigError::CreateDir { .. } => "config_create_dir",
        }
    }
}

/// # Errors raised by the external capture collaborators.
///
/// A failed capture aborts its action before any artifact exists, so the
/// retention step is skipped and the last-artifact slot stays untouched.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum CaptureError {
    /// The HTTP fetch failed before or while streaming the body.
    #[error("fetching {url}: {source}")]
    Fetch {
        /// The URL that was being fetched.
        url: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("fetching {url}: unexpected status {status}")]
    Status {
        /// The URL that was being fetched.
        url: String,
        /// The HTTP status code returned.
        status: u16,
    },

    /// The capture device reported a failure.
    #[error("device '{device}': {reason}")]
    Device {
        /// Name of the failing device capability.
        device: String,
        /// Device-reported failure description.
        reason: String,
    },

    /// The artifact file could not be written.
    #[error("writing {}: {source}", path.display())]
    Write {
        /// Target path of the failed write.
        path: PathBuf,
        /// Underlying filesystem error.
        #[source]
        source: io::Error,
    },
}

impl CaptureError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            CaptureError::Fetch { .. } => "capture_fetch",
            CaptureError::Status { .. } => "capture_status",
            CaptureError::Device { .. } => "capture_device",
            CaptureError::Write { .. } => "capture_write",
        }
    }
}

/// # A single file that could not be removed during pruning.
///
/// Pruning collects these instead of aborting: one failed deletion never
/// prevents deletion attempts on the remaining candidates. The complete
/// list is returned to the caller after the pass.
#[derive(Error, Debug)]
#[error("removing {}: {source}", path.display())]
pub struct CleanupError {
    /// The file that survived its deletion attempt.
    pub path: PathBuf,
    /// Underlying filesystem error.
    #[source]
    pub source: io::Error,
}

/// # Errors raised by [`Action::execute`](crate::Action::execute).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ActionError {
    /// A required setting was missing or invalid at execution time.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The external capture collaborator failed.
    #[error(transparent)]
    Capture(#[from] CaptureError),

    /// The retention directory could not be used.
    #[error("artifact directory: {0}")]
    Directory(#[from] io::Error),
}

impl ActionError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            ActionError::Config(e) => e.as_label(),
            ActionError::Capture(e) => e.as_label(),
            ActionError::Directory(_) => "action_directory",
        }
    }
}

/// # Errors returned by event handlers.
///
/// Caught at the dispatch boundary ([`Bus::fire`](crate::Bus::fire) /
/// [`Bus::fire_sync`](crate::Bus::fire_sync)), logged with the event name,
/// source and handler identity, and never observed by the firing caller.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum HandlerError {
    /// An action failed while executing.
    ///
    /// Carries both identity strings so the dispatch-boundary log shows
    /// which action failed and what it was configured to do.
    #[error("action {identity} ({description}): {source}")]
    Action {
        /// Canonical identity, e.g. `snap_url:http://10.0.0.7/still`.
        identity: String,
        /// Human-readable description of the action.
        description: String,
        /// The underlying execution failure.
        #[source]
        source: ActionError,
    },

    /// Any other handler failure.
    #[error("{0}")]
    Other(String),
}

impl HandlerError {
    /// Builds a [`HandlerError::Other`] from any displayable reason.
    ///
    /// # Example
    /// ```
    /// use gatehouse::HandlerError;
    ///
    /// let err = HandlerError::other("relay board not responding");
    /// assert_eq!(err.to_string(), "relay board not responding");
    /// ```
    pub fn other(reason: impl Into<String>) -> Self {
        HandlerError::Other(reason.into())
    }

    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            HandlerError::Action { .. } => "handler_action",
            HandlerError::Other(_) => "handler_other",
        }
    }
}

/// # Error returned by [`OwnerThread::submit`](crate::OwnerThread::submit).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitError {
    /// The owner thread has exited and its queue is closed.
    #[error("owner thread closed")]
    Closed,
}
