//! # Demo: doorbell
//!
//! End-to-end wiring of the event core: a registry-built snapshot action
//! subscribed to `OnDoorbell`, fired through the bridge, storing pruned
//! artifacts in a retention-managed directory.
//!
//! Shows how to:
//! - Implement the [`CaptureDevice`] capability for a camera stand-in.
//! - Register and construct actions through [`Registry`].
//! - Subscribe an action via [`ActionHandler`] and fire with
//!   [`Bridge::dual_fire`].
//! - Read the newest artifact back from the [`LastArtifact`] slot.
//!
//! ## Flow
//! ```text
//! dual_fire("OnDoorbell")
//!     ├─► fire("OnDoorbell") ──► ActionHandler ──► DeviceSnapshotAction
//!     │                              ├─► ArtifactDir::next_path()
//!     │                              ├─► StubCamera::capture_to()
//!     │                              └─► ArtifactDir::prune(Keep(3))
//!     └─► fire_sync("OnDoorbell_S") ──► console shadow handler
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example doorbell
//! ```

use std::path::Path;
use std::sync::Arc;

use gatehouse::{
    ActionHandler, Bridge, Bus, CaptureDevice, CaptureError, DeviceSnapshotAction, Event,
    FnHandler, HandlerError, LastArtifact, Registry, Resolution, SnapshotConfig,
};

/// Camera stand-in that "captures" a frame by writing stub bytes.
struct StubCamera;

#[async_trait::async_trait]
impl CaptureDevice for StubCamera {
    fn probe(&self) -> Result<(), CaptureError> {
        // A real driver would open the device node here.
        Ok(())
    }

    async fn capture_to(&self, target: &Path, resolution: Resolution) -> Result<(), CaptureError> {
        let frame = format!("stub frame at {resolution}");
        tokio::fs::write(target, frame.as_bytes())
            .await
            .map_err(|source| CaptureError::Write {
                path: target.to_path_buf(),
                source,
            })
    }

    fn name(&self) -> &str {
        "stub-camera"
    }
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gatehouse=debug".into()),
        )
        .init();

    let storage = tempfile::tempdir()?;
    let cfg = SnapshotConfig {
        path: storage.path().to_path_buf(),
        keep: 3,
        ..SnapshotConfig::default()
    };

    let slot = LastArtifact::new();
    let dir = cfg.resolve(slot.clone())?;

    // Startup: the registry is built once, then never changes.
    let registry = Registry::builder()
        .register(
            DeviceSnapshotAction::ID,
            DeviceSnapshotAction::factory(dir.clone(), cfg.retention(), Arc::new(StubCamera)),
        )
        .build();
    let action = registry.construct(DeviceSnapshotAction::ID, "640x480")?;
    println!("constructed: {} ({})", action.identify(), action.describe());

    let bus = Bus::new();
    bus.subscribe("OnDoorbell", ActionHandler::arc(action));
    bus.subscribe(
        "OnDoorbell_S",
        FnHandler::arc("console", |ev: Event| async move {
            println!("shadow delivery: {} from {}", ev.name, ev.source);
            Ok::<_, HandlerError>(())
        }),
    );

    // Ring five times; retention keeps only the newest three artifacts.
    let bridge = Bridge::new(bus);
    for ring in 1..=5u32 {
        bridge
            .dual_fire(Event::new("OnDoorbell", "demo").with_extra("ring", ring.to_string()))
            .await;
        // Artifact names have second resolution; spacing the rings out
        // keeps every capture distinct.
        tokio::time::sleep(std::time::Duration::from_millis(1100)).await;
    }

    println!("\nretained artifacts:");
    for file in dir.list_all()? {
        println!("  {}", file.display());
    }
    if let Some(last) = slot.get() {
        println!("last snapshot: {}", last.display());
    }

    Ok(())
}
