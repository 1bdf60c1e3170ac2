//! # gatehouse
//!
//! **Gatehouse** is the event-notification core of an embedded entry
//! controller: named events with dual async/sync dispatch, configured
//! actions constructed once at startup, and a retention-managed snapshot
//! directory for capture-style actions.
//!
//! The crate is a building block: device integrations (SIP stack, GPIO,
//! web layer) fire events into it, and configuration decides which
//! actions react.
//!
//! ## Architecture
//! ### Dispatch
//! ```text
//!   sipphone ─┐                                ┌─► handler (tokio task)
//!   gpio ─────┼─► Bridge::dual_fire(ev)        ├─► handler (tokio task)
//!   web ──────┘         │                      │     unbounded, unordered
//!                       ├─► Bus::fire(ev) ─────┘
//!                       │
//!                       └─► Bus::fire_sync(ev + "_S")
//!                              │   awaited sequentially in the caller's context
//!                              └─► shadow handlers (thread-pinned work)
//! ```
//!
//! Thread-sensitive integrations run on one dedicated [`OwnerThread`] and
//! fire through [`Bridge::dual_fire_blocking`]; their shadow handlers then
//! execute on that single thread, so the integration never meets a second
//! one.
//!
//! ### Capture lifecycle
//! ```text
//! "OnDoorbell" ──► ActionHandler ──► UrlSnapshotAction::execute
//!                                        │  GET http://cam/still
//!                                        ▼
//!                          ArtifactDir::next_path()    (records LastArtifact)
//!                                        │  stream body to file
//!                                        ▼
//!                          ArtifactDir::prune(policy)  (delete oldest surplus,
//!                                                       collect failures)
//! ```
//!
//! ## Features
//! | Area            | Description                                                       | Key types / traits                                 |
//! |-----------------|-------------------------------------------------------------------|----------------------------------------------------|
//! | **Events**      | Named firings with payload metadata and monotonic sequence ids.   | [`Event`]                                          |
//! | **Dispatch**    | Async task-per-handler and sequential in-context delivery.        | [`Bus`], [`Bridge`], [`SHADOW_SUFFIX`]             |
//! | **Handlers**    | Subscribed consumers with failure isolation at the boundary.      | [`Handler`], [`FnHandler`], [`ActionHandler`]      |
//! | **Actions**     | Identifier + argument string to ready action, probed at startup.  | [`Action`], [`Registry`], [`Factory`]              |
//! | **Capture**     | HTTP and device snapshot actions with capture-then-prune.         | [`UrlSnapshotAction`], [`DeviceSnapshotAction`]    |
//! | **Retention**   | Timestamp-named artifacts, keep-newest pruning, shared last slot. | [`ArtifactDir`], [`RetentionPolicy`], [`LastArtifact`] |
//! | **Owner thread**| One dedicated OS thread per thread-sensitive integration.         | [`OwnerThread`]                                    |
//! | **Errors**      | Failures scoped to one handler, one file, one capture.            | [`HandlerError`], [`CaptureError`], [`CleanupError`] |
//! | **Configuration**| Typed snapshot settings with sentinel semantics.                 | [`SnapshotConfig`]                                 |
//!
//! ## Example
//! ```no_run
//! use gatehouse::{
//!     ActionHandler, ArtifactDir, Bridge, Bus, Event, LastArtifact, Registry,
//!     RetentionPolicy, UrlSnapshotAction,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Retention-managed snapshot directory shared by capture actions.
//!     let slot = LastArtifact::new();
//!     let dir = ArtifactDir::resolve("/var/lib/gatehouse/snapshots", "jpg", slot.clone())?;
//!
//!     // Startup-time action registry: identifiers to probing factories.
//!     let registry = Registry::builder()
//!         .register(
//!             UrlSnapshotAction::ID,
//!             UrlSnapshotAction::factory(dir, RetentionPolicy::Keep(10)),
//!         )
//!         .build();
//!
//!     // Wire the configured action to its event.
//!     let bus = Bus::new();
//!     let action = registry.construct(UrlSnapshotAction::ID, "http://10.0.0.7/still")?;
//!     bus.subscribe("OnDoorbell", ActionHandler::arc(action));
//!
//!     // Fire: async handlers, then the awaited "_S" shadow delivery.
//!     let bridge = Bridge::new(bus);
//!     bridge.dual_fire(Event::new("OnDoorbell", "demo")).await;
//!
//!     if let Some(path) = slot.get() {
//!         println!("latest snapshot: {}", path.display());
//!     }
//!     Ok(())
//! }
//! ```
mod actions;
mod config;
mod error;
mod events;
mod retention;
mod worker;

// ---- Public re-exports ----

pub use actions::{
    Action, ActionHandler, ActionRef, CaptureDevice, DeviceSnapshotAction, Factory, Registry,
    RegistryBuilder, Resolution, UrlSnapshotAction,
};
pub use config::SnapshotConfig;
pub use error::{ActionError, CaptureError, CleanupError, ConfigError, HandlerError, SubmitError};
pub use events::{shadow_name, Bridge, Bus, Event, FnHandler, Handler, HandlerRef, SHADOW_SUFFIX};
pub use retention::{ArtifactDir, LastArtifact, RetentionPolicy};
pub use worker::OwnerThread;
