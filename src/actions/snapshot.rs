//! # Snapshot capture actions.
//!
//! Two actions write timestamped artifacts into a retention-managed
//! directory when their event fires:
//!
//! - [`UrlSnapshotAction`] (`snap_url`) fetches a still frame over HTTP,
//!   typically from an IP camera's snapshot endpoint.
//! - [`DeviceSnapshotAction`] (`snap_device`) asks an attached
//!   [`CaptureDevice`] to write a frame directly into the target path.
//!
//! Both follow capture-then-prune: allocate, produce the file, prune the
//! surplus, all back to back. A failed capture aborts before pruning, so
//! a broken camera never costs stored history.
//!
//! ```text
//!  event ──► execute()
//!              │ fetch / device capture
//!              ▼
//!        dir.next_path() ──► write artifact ──► dir.prune(policy)
//! ```

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::{ActionError, CaptureError, ConfigError};
use crate::events::Event;
use crate::retention::{ArtifactDir, RetentionPolicy};

use super::action::Action;
use super::registry::Factory;

/// Frame size for device captures, written `WxH`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    /// Parses a `WxH` argument string, e.g. `1280x720`.
    ///
    /// The returned reason string feeds
    /// [`ConfigError::InvalidArgs`](crate::ConfigError::InvalidArgs).
    pub fn parse(s: &str) -> Result<Self, String> {
        let (w, h) = s
            .split_once('x')
            .or_else(|| s.split_once('X'))
            .ok_or_else(|| format!("expected WxH, got '{s}'"))?;
        let width = w
            .trim()
            .parse()
            .map_err(|_| format!("invalid width in '{s}'"))?;
        let height = h
            .trim()
            .parse()
            .map_err(|_| format!("invalid height in '{s}'"))?;
        Ok(Self { width, height })
    }
}

impl Default for Resolution {
    /// Returns the stock 1024x768 capture size.
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// # A device that can produce a frame file on demand.
///
/// The contract is deterministic: given a target path, either the file
/// exists with a complete frame when `capture_to` returns `Ok`, or the
/// call fails and the caller treats the path as dead.
///
/// [`probe`](CaptureDevice::probe) is called once at action construction
/// time, so a missing or misconfigured device fails the whole startup
/// instead of every firing.
#[async_trait]
pub trait CaptureDevice: Send + Sync {
    /// Cheap availability check, run at construction time.
    fn probe(&self) -> Result<(), CaptureError>;

    /// Captures one frame into `target` at `resolution`.
    async fn capture_to(&self, target: &Path, resolution: Resolution) -> Result<(), CaptureError>;

    /// Device identity used in errors and logs.
    ///
    /// Defaults to the implementing type's name.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Fetches a still frame over HTTP and stores it as an artifact.
pub struct UrlSnapshotAction {
    url: reqwest::Url,
    client: reqwest::Client,
    dir: ArtifactDir,
    policy: RetentionPolicy,
}

impl UrlSnapshotAction {
    /// Identifier this action registers under.
    pub const ID: &'static str = "snap_url";

    /// Builds the registry factory for this action.
    ///
    /// The factory parses its argument as a URL at construction time,
    /// failing fast instead of deferring to the first firing.
    pub fn factory(dir: ArtifactDir, policy: RetentionPolicy) -> Factory {
        Box::new(move |args: &str| {
            let url = reqwest::Url::parse(args).map_err(|e| ConfigError::InvalidArgs {
                id: Self::ID.to_string(),
                reason: format!("invalid url '{args}': {e}"),
            })?;
            Ok(Arc::new(Self {
                url,
                client: reqwest::Client::new(),
                dir: dir.clone(),
                policy,
            }))
        })
    }

    /// Streams the response body into `target` in chunks.
    async fn stream_to(&self, response: reqwest::Response, target: &Path) -> Result<(), CaptureError> {
        let write_err = |source| CaptureError::Write {
            path: target.to_path_buf(),
            source,
        };
        let mut file = tokio::fs::File::create(target).await.map_err(write_err)?;
        let mut body = response.bytes_stream();
        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|source| CaptureError::Fetch {
                url: self.url.to_string(),
                source,
            })?;
            file.write_all(&chunk).await.map_err(write_err)?;
        }
        file.flush().await.map_err(write_err)?;
        Ok(())
    }
}

#[async_trait]
impl Action for UrlSnapshotAction {
    async fn execute(&self, event: &Event) -> Result<(), ActionError> {
        debug!(event = %event.name, seq = event.seq, url = %self.url, "fetching snapshot");

        // Fail before allocating: a refused fetch leaves no artifact to
        // account for, so retention is skipped entirely.
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|source| CaptureError::Fetch {
                url: self.url.to_string(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(CaptureError::Status {
                url: self.url.to_string(),
                status: status.as_u16(),
            }
            .into());
        }

        let target = self.dir.next_path()?;
        self.stream_to(response, &target).await?;
        self.dir.prune(self.policy)?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("save a snapshot fetched from {}", self.url)
    }

    fn identify(&self) -> String {
        format!("{}:{}", Self::ID, self.url)
    }
}

/// Captures a frame from an attached device into an artifact.
pub struct DeviceSnapshotAction {
    device: Arc<dyn CaptureDevice>,
    resolution: Resolution,
    dir: ArtifactDir,
    policy: RetentionPolicy,
}

impl DeviceSnapshotAction {
    /// Identifier this action registers under.
    pub const ID: &'static str = "snap_device";

    /// Builds the registry factory for this action.
    ///
    /// The argument is an optional `WxH` resolution (empty means the
    /// default). The factory probes the device and fails fast when it is
    /// unavailable.
    pub fn factory(
        dir: ArtifactDir,
        policy: RetentionPolicy,
        device: Arc<dyn CaptureDevice>,
    ) -> Factory {
        Box::new(move |args: &str| {
            let args = args.trim();
            let resolution = if args.is_empty() {
                Resolution::default()
            } else {
                Resolution::parse(args).map_err(|reason| ConfigError::InvalidArgs {
                    id: Self::ID.to_string(),
                    reason,
                })?
            };
            device.probe().map_err(|e| ConfigError::InvalidArgs {
                id: Self::ID.to_string(),
                reason: e.to_string(),
            })?;
            Ok(Arc::new(Self {
                device: device.clone(),
                resolution,
                dir: dir.clone(),
                policy,
            }))
        })
    }
}

#[async_trait]
impl Action for DeviceSnapshotAction {
    async fn execute(&self, event: &Event) -> Result<(), ActionError> {
        debug!(
            event = %event.name,
            seq = event.seq,
            device = self.device.name(),
            resolution = %self.resolution,
            "capturing snapshot"
        );

        // The device writes straight into the allocated path.
        let target = self.dir.next_path()?;
        self.device.capture_to(&target, self.resolution).await?;
        self.dir.prune(self.policy)?;
        Ok(())
    }

    fn describe(&self) -> String {
        "take a snapshot from the capture device".to_string()
    }

    fn identify(&self) -> String {
        format!("{}:{}", Self::ID, self.resolution)
    }
}
